use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?").expect("placeholder pattern is valid"));

/// Collapse whitespace and rewrite `?` placeholders into Postgres `$n` form.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 0;
    PLACEHOLDER
        .replace_all(&cleaned, |_: &regex::Captures| {
            param_index += 1;
            format!("${}", param_index)
        })
        .into_owned()
}
