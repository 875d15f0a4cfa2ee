//! 最小的 CSV 解析：逗号分隔、双引号包裹、`""` 转义，不支持跨行字段

use std::collections::BTreeMap;

const BOM: char = '\u{feff}';

/// 按逗号切分一行，引号内的逗号不切分，引号外的空白被去掉
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() && !quoted => {
                current.clear();
                in_quotes = true;
                quoted = true;
            }
            ',' if !in_quotes => {
                fields.push(finish_field(&mut current, quoted));
                quoted = false;
            }
            _ if quoted && !in_quotes => {
                // 结束引号之后的多余字符，只保留非空白部分
                if !c.is_whitespace() {
                    current.push(c);
                }
            }
            _ => current.push(c),
        }
    }
    fields.push(finish_field(&mut current, quoted));
    fields
}

fn finish_field(current: &mut String, quoted: bool) -> String {
    let field = std::mem::take(current);
    if quoted { field } else { field.trim().to_string() }
}

/// 必要时给字段加引号，供模板导出使用
pub fn encode_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"'])
        || field.starts_with(char::is_whitespace)
        || field.ends_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn encode_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| encode_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// 解析后的表格：首行作表头，其余为数据行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    /// (源文件行号, 与表头等长的字段)
    pub rows: Vec<(usize, Vec<String>)>,
}

impl CsvTable {
    /// 空行被跳过；短行补空字符串，多余字段丢弃
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header)) = lines.next() else {
            return Self::default();
        };
        let headers = parse_line(header);

        let rows = lines
            .map(|(line_no, line)| {
                let mut fields = parse_line(line);
                fields.resize(headers.len(), String::new());
                (line_no, fields)
            })
            .collect();

        Self { headers, rows }
    }

    /// 按位置把表头和一行字段拼成对象
    pub fn record(&self, fields: &[String]) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .cloned()
            .zip(fields.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_fields() {
        assert_eq!(parse_line("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_line("a,,c,"), vec!["a", "", "c", ""]);
    }

    #[test]
    fn quoted_field_with_comma_and_escaped_quote_round_trips() {
        let original = r#"He said "hi", then left"#;
        let line = encode_line(&["x", original, "y"]);
        assert_eq!(line, r#"x,"He said ""hi"", then left",y"#);
        assert_eq!(parse_line(&line), vec!["x", original, "y"]);
    }

    #[test]
    fn quoted_field_keeps_inner_whitespace() {
        assert_eq!(parse_line(r#" " padded " ,b"#), vec![" padded ", "b"]);
    }

    #[test]
    fn table_zips_header_positionally() {
        let text = "\u{feff}用户名,姓名,角色\r\nli,\"李, 明\",学生\r\n\r\nwang,王芳\r\n";
        let table = CsvTable::parse(text);

        assert_eq!(table.headers, vec!["用户名", "姓名", "角色"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].0, 4);

        let first = table.record(&table.rows[0].1);
        assert_eq!(first["姓名"], "李, 明");
        let second = table.record(&table.rows[1].1);
        assert_eq!(second["角色"], "");
    }

    #[test]
    fn extra_fields_are_dropped() {
        let table = CsvTable::parse("a,b\n1,2,3\n");
        assert_eq!(table.rows[0].1, vec!["1", "2"]);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        assert_eq!(CsvTable::parse(""), CsvTable::default());
        assert_eq!(CsvTable::parse("\u{feff}\n\n"), CsvTable::default());
    }
}
