use std::collections::HashMap;

/// Template processor resolving `$VARIABLE` and `((variable))` references
pub struct Tpl {
    variables: HashMap<String, String>,
}

impl Tpl {
    pub fn new() -> Self {
        Self {
            variables: HashMap::new(),
        }
    }

    /// Register a variable with its value
    pub fn register<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.variables.insert(key.into(), value.into());
    }

    /// Parse a string and resolve all `$VARIABLE` references
    pub fn parse(&self, input: &str) -> String {
        self.substitute(input, |key| format!("${}", key))
    }

    /// Resolve BOSH-style `((variable))` placeholders, leaving unknown ones in place.
    ///
    /// A placeholder forming a whole YAML value (`key: ((v))`, `- ((v))`) is
    /// written as a single-quoted string so `2048` or `true` stay strings.
    /// Placeholders embedded in a larger scalar are substituted verbatim.
    pub fn interpolate(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for line in input.split_inclusive('\n') {
            let mut pos = 0;
            while let Some(open) = line[pos..].find("((") {
                let start = pos + open;
                let Some(close) = line[start + 2..].find("))") else {
                    break;
                };
                let end = start + 2 + close + 2;
                out.push_str(&line[pos..start]);
                match self.variables.get(&line[start + 2..end - 2]) {
                    Some(value) if is_whole_value(&line[..start], &line[end..]) => {
                        out.push_str(&yaml_quote(value))
                    }
                    Some(value) => out.push_str(value),
                    None => out.push_str(&line[start..end]),
                }
                pos = end;
            }
            out.push_str(&line[pos..]);
        }
        out
    }

    fn substitute(&self, input: &str, pattern: impl Fn(&str) -> String) -> String {
        // Longest keys first so `$NAME` never clobbers `$NAME_SUFFIX`.
        let mut keys: Vec<&String> = self.variables.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut result = input.to_string();
        for key in keys {
            result = result.replace(&pattern(key), &self.variables[key]);
        }
        result
    }
}

fn is_whole_value(before: &str, after: &str) -> bool {
    let after = after.trim_start();
    if !(after.is_empty() || after.starts_with('#')) {
        return false;
    }

    let lead = before.trim_end();
    if lead.is_empty() {
        return true;
    }
    if lead.len() == before.len() {
        return false;
    }
    if lead.ends_with(':') {
        return true;
    }
    lead.strip_suffix('-')
        .is_some_and(|rest| rest.is_empty() || rest.ends_with(char::is_whitespace))
}

fn yaml_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl Default for Tpl {
    fn default() -> Self {
        Self::new()
    }
}
