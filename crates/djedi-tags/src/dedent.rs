/// Remove the indentation shared by every non-blank line.
///
/// Lines holding only spaces and tabs are emptied and ignored when finding
/// the common margin.
#[must_use]
pub fn dedent(text: &str) -> String {
    let is_blank = |line: &str| line.trim_matches([' ', '\t']).is_empty();

    let mut margin: Option<&str> = None;
    for line in text.split('\n').filter(|line| !is_blank(line)) {
        let indent = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => {
                let shared = current
                    .bytes()
                    .zip(indent.bytes())
                    .take_while(|(a, b)| a == b)
                    .count();
                &current[..shared]
            }
        });
    }
    let margin = margin.unwrap_or_default().len();

    text.split('\n')
        .map(|line| if is_blank(line) { "" } else { &line[margin..] })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The default text of a block body: outer line breaks stripped, then
/// dedented.
#[must_use]
pub fn default_text(body: &str) -> String {
    dedent(body.trim_matches(['\n', '\r']))
}
