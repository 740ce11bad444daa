//! `{placeholder}` substitution for profile templates.
//!
//! A placeholder is `{name}` with `name` made of ASCII letters, digits and `_`.
//! Names not supplied by the caller are left verbatim, so target-language
//! braces (`{ state: 'visible' }`, `({ page })`) need no escaping.

/// Values available to one template expansion
#[derive(Clone, Debug, Default)]
pub struct Vars<'a> {
    entries: Vec<(&'a str, String)>,
}

impl<'a> Vars<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'a str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &'a str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Expand `template` with `vars`
pub fn render(template: &str, vars: &Vars<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let closes = after[name_len..].starts_with('}');
        match vars.get(&after[..name_len]) {
            Some(value) if name_len > 0 && closes => {
                out.push_str(value);
                rest = &after[name_len + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Placeholders used by `template`, in order of first use
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if name_len > 0 && after[name_len..].starts_with('}') {
            let name = &after[..name_len];
            if !names.contains(&name) {
                names.push(name);
            }
        }
        rest = after;
    }
    names
}

/// Prefix every non-empty line of `text` with `levels` indentation units
pub fn indent(text: &str, levels: usize, unit: &str) -> String {
    let prefix = unit.repeat(levels);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_known_placeholders() {
        let vars = Vars::new().with("element", "page.locator('#go')");
        assert_eq!(
            render("await {element}.waitFor({ state: 'visible' });", &vars),
            "await page.locator('#go').waitFor({ state: 'visible' });"
        );
    }

    #[test]
    fn test_unknown_placeholder_is_kept() {
        let vars = Vars::new().with("name", "x");
        assert_eq!(render("{name} {other} {", &vars), "x {other} {");
    }

    #[test]
    fn test_set_overrides() {
        let mut vars = Vars::new().with("a", "1");
        vars.set("a", "2");
        assert_eq!(render("{a}{a}", &vars), "22");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders("{scope}.locator('#{value}') { x: 1 } {value}"),
            vec!["scope", "value"]
        );
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb", 1, "  "), "  a\n\n  b");
    }
}
