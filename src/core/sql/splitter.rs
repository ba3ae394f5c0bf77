use tracing::debug;

/// 按分号拆分输入，双引号内的分号不算分隔符。
///
/// 每条语句去掉首尾空白，空语句被丢弃；最后一段没有分号结尾的文本不执行。
pub fn split_statements(input: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_string = !in_string;
                current.push(c);
            }
            ';' if !in_string => {
                let statement = current.trim();
                if !statement.is_empty() {
                    statements.push(statement.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if !current.trim().is_empty() {
        debug!(fragment = current.trim(), "discarding statement without terminating ';'");
    }
    statements
}
