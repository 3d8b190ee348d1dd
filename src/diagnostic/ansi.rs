use super::Diagnostic;

pub struct AnsiRenderer {
    pub use_color: bool,
}

impl AnsiRenderer {
    fn bold(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1m{s}\x1b[0m") } else { s.to_string() }
    }

    fn bold_red(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1;31m{s}\x1b[0m") } else { s.to_string() }
    }

    fn cyan(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[36m{s}\x1b[0m") } else { s.to_string() }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[2m{s}\x1b[0m") } else { s.to_string() }
    }

    pub fn render(&self, d: &Diagnostic) -> String {
        let mut out = String::new();

        // "error[OOS-M002]: message"
        let head = match d.code {
            Some(code) => format!("error[{code}]"),
            None => "error".to_string(),
        };
        out.push_str(&format!("{}: {}\n", self.bold_red(&head), self.bold(&d.message)));

        if let Some(step) = d.step {
            out.push_str(&format!("  {} step {}\n", self.cyan("-->"), step));
        }

        for note in &d.notes {
            out.push_str(&format!("  {} note: {}\n", self.dim("="), note));
        }

        if let Some(suggestion) = &d.suggestion {
            out.push_str(&format!("  {} suggestion: {}\n", self.dim("="), suggestion));
        }

        if let Some(code) = d.code {
            out.push_str(&format!("  {} run `oos --explain {}` for details\n", self.dim("="), code));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diag() -> Diagnostic {
        Diagnostic::error("access denied: 'deposit' is private to class bank")
            .with_code("OOS-M002")
            .at_step(3)
            .with_note("in class 'bank'")
            .with_suggestion("send it from a bank method")
    }

    #[test]
    fn render_contains_error_label_and_code() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag());
        assert!(out.starts_with("error[OOS-M002]: access denied"), "bad head in:\n{out}");
    }

    #[test]
    fn render_contains_step() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag());
        assert!(out.contains("--> step 3"), "missing step in:\n{out}");
    }

    #[test]
    fn render_contains_note_suggestion_and_explain_hint() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag());
        assert!(out.contains("note: in class 'bank'"), "missing note in:\n{out}");
        assert!(out.contains("suggestion:"), "missing suggestion in:\n{out}");
        assert!(out.contains("--explain OOS-M002"), "missing explain hint in:\n{out}");
    }

    #[test]
    fn render_bare_error() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&Diagnostic::error("something bad"));
        assert_eq!(out, "error: something bad\n");
    }

    #[test]
    fn render_with_color_contains_ansi_codes() {
        let r = AnsiRenderer { use_color: true };
        let out = r.render(&make_diag());
        assert!(out.contains("\x1b["), "expected ANSI codes when use_color=true");
    }

    #[test]
    fn render_without_color_no_ansi_codes() {
        let r = AnsiRenderer { use_color: false };
        let out = r.render(&make_diag());
        assert!(!out.contains("\x1b["), "unexpected ANSI codes when use_color=false");
    }
}
