/// File name used when exporting a ticket: non-alphanumerics become `_`, all lower-case.
/// Characters outside the BMP take one `_` per UTF-16 unit.
pub fn export_file_name(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else {
            stem.extend(std::iter::repeat_n('_', c.len_utf16()));
        }
    }
    format!("{stem}.txt")
}
