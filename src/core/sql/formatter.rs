use crate::core::types::QueryResult;

pub struct TableFormatter;

impl TableFormatter {
    /// 逗号分隔输出：先输出表头行，再逐行输出数据，每行以换行结束。
    /// 含有逗号、双引号或换行的值用双引号包裹，内部双引号写两次。
    pub fn format_csv(result: &QueryResult) -> String {
        let mut output = String::new();
        output.push_str(&Self::csv_line(&result.headers));
        for row in &result.rows {
            output.push_str(&Self::csv_line(row));
        }
        output
    }

    /// 带边框的定宽表格。
    /// 列宽取表头和所有单元格中最长的长度，内容左对齐，左右各留一个空格。
    pub fn format_ascii(result: &QueryResult) -> String {
        let mut widths: Vec<usize> = result.headers.iter().map(String::len).collect();
        for row in &result.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let border = Self::border(&widths);
        let mut output = String::new();
        output.push_str(&border);
        output.push_str(&Self::format_row(&result.headers, &widths));
        output.push_str(&border);
        for row in &result.rows {
            output.push_str(&Self::format_row(row, &widths));
        }
        output.push_str(&border);
        output
    }

    pub fn format_json(result: &QueryResult) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(result)?;
        json.push('\n');
        Ok(json)
    }

    fn csv_line(cells: &[String]) -> String {
        let mut line = cells
            .iter()
            .map(|cell| Self::csv_escape(cell))
            .collect::<Vec<_>>()
            .join(",");
        line.push('\n');
        line
    }

    fn csv_escape(value: &str) -> String {
        if value.contains([',', '"', '\n']) {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    fn border(widths: &[usize]) -> String {
        let mut line = String::from("+");
        for width in widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line.push('\n');
        line
    }

    fn format_row(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("|");
        for (cell, width) in cells.iter().zip(widths) {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(width - cell.len()));
            line.push_str(" |");
        }
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(headers: &[&str], rows: &[&[&str]]) -> QueryResult {
        QueryResult {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let r = result(&["name", "note"], &[&["alice", "a,b"], &["bob", "say \"hi\""], &["c", "x\ny"]]);
        assert_eq!(
            TableFormatter::format_csv(&r),
            "name,note\nalice,\"a,b\"\nbob,\"say \"\"hi\"\"\"\nc,\"x\ny\"\n"
        );
    }

    #[test]
    fn csv_header_only_for_empty_result() {
        let r = result(&["a", "b"], &[]);
        assert_eq!(TableFormatter::format_csv(&r), "a,b\n");
    }

    #[test]
    fn ascii_table_layout() {
        let r = result(&["name", "age"], &[&["carol", "35"], &["al", "7"]]);
        let expected = "\
+-------+-----+
| name  | age |
+-------+-----+
| carol | 35  |
| al    | 7   |
+-------+-----+
";
        assert_eq!(TableFormatter::format_ascii(&r), expected);
    }

    #[test]
    fn ascii_table_without_rows() {
        let r = result(&["id"], &[]);
        assert_eq!(TableFormatter::format_ascii(&r), "+----+\n| id |\n+----+\n+----+\n");
    }

    #[test]
    fn json_rendering() {
        let r = result(&["a"], &[&["1"]]);
        let json: serde_json::Value =
            serde_json::from_str(&TableFormatter::format_json(&r).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"headers": ["a"], "rows": [["1"]]}));
    }
}
