use super::Diagnostic;

pub fn render(d: &Diagnostic) -> String {
    let mut obj = serde_json::json!({
        "severity": "error",
        "message": d.message,
        "notes": d.notes,
    });

    if let Some(code) = d.code {
        obj["code"] = serde_json::Value::String(code.to_string());
    }

    if let Some(step) = d.step {
        obj["step"] = serde_json::Value::from(step);
    }

    if let Some(s) = &d.suggestion {
        obj["suggestion"] = serde_json::Value::String(s.clone());
    }

    serde_json::to_string(&obj).unwrap_or_else(|_| {
        r#"{"severity":"error","message":"internal error serializing diagnostic"}"#.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_json(s: &str) -> serde_json::Value {
        serde_json::from_str(s).expect("valid JSON")
    }

    #[test]
    fn render_basic_error() {
        let d = Diagnostic::error("class not found: bank");
        let v = parse_json(&render(&d));
        assert_eq!(v["severity"], "error");
        assert_eq!(v["message"], "class not found: bank");
        assert!(v["notes"].as_array().unwrap().is_empty());
        assert!(v.get("code").is_none());
        assert!(v.get("step").is_none());
    }

    #[test]
    fn render_code_and_step() {
        let d = Diagnostic::error("bank is not defined").with_code("OOS-S001").at_step(7);
        let v = parse_json(&render(&d));
        assert_eq!(v["code"], "OOS-S001");
        assert_eq!(v["step"], 7);
    }

    #[test]
    fn render_with_notes_and_suggestion() {
        let d = Diagnostic::error("bad")
            .with_note("first")
            .with_note("second")
            .with_suggestion("try this instead");
        let v = parse_json(&render(&d));
        let notes = v["notes"].as_array().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0], "first");
        assert_eq!(v["suggestion"], "try this instead");
    }

    #[test]
    fn render_is_single_line() {
        let d = Diagnostic::error("multi\nline").with_note("x");
        assert!(!render(&d).contains('\n'));
    }
}
