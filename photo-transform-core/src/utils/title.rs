//! 标题生成：把 format / 命令名转换为界面可读文本

/// Humanizes a format string or qualifier name for display.
///
/// Keeps the text after the first `:`, drops `,` `<` `>`, turns `_` into spaces and
/// cuts at the first `.` (else `;`). With `capitalize`, everything before a remaining
/// `:` is upper-cased, otherwise only the first character.
pub fn title(text: &str, capitalize: bool) -> String {
    let tail = text.split_once(':').map_or(text, |(_, rest)| rest);
    let mut out: String = tail
        .chars()
        .filter(|c| !matches!(c, ',' | '<' | '>'))
        .map(|c| if c == '_' { ' ' } else { c })
        .collect();

    if let Some(idx) = out.find('.').or_else(|| out.find(';')) {
        out.truncate(idx);
    }

    if capitalize {
        out = match out.find(':') {
            Some(idx) => format!("{}{}", out[..idx].to_uppercase(), &out[idx..]),
            None => {
                let mut chars = out.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => out,
                }
            }
        };
    }
    out
}
