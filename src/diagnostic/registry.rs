/// An entry in the error code registry.
pub struct ErrorEntry {
    pub code: &'static str,
    pub short: &'static str,  // one line, shown by tooling
    pub long: &'static str,   // full explanation for --explain
}

/// All stable error codes of the runtime and the script driver.
pub static REGISTRY: &[ErrorEntry] = &[
    // ── Classes ──────────────────────────────────────────────────────────────
    ErrorEntry {
        code: "OOS-C001",
        short: "class not found",
        long: r#"## OOS-C001: class not found

A class name was used before any class of that name was defined. This
happens when `new` names an unknown class, or when `define` lists an
unknown base.

**Example that triggers this:**

    {"define": {"name": "franc_bank", "bases": ["bank"]}}

when `bank` has not been defined yet.

**Fix:** define base classes first. Classes are defined in order.
"#,
    },
    ErrorEntry {
        code: "OOS-C002",
        short: "class already defined",
        long: r#"## OOS-C002: class already defined

A class of this name already exists. Class names are global and a
class cannot be redefined or replaced once registered; instances and
derived classes hold on to the original definition.

**Fix:** pick a new name, or derive from the existing class and
override the methods you need.
"#,
    },
    // ── Methods ──────────────────────────────────────────────────────────────
    ErrorEntry {
        code: "OOS-M001",
        short: "method not found",
        long: r#"## OOS-M001: method not found

No class in the receiver's inheritance chain defines a method of this
name, and the name is not an accessor (`get-<attr>` or `set-<attr>`)
for an attribute declared anywhere in the chain.

The same error is raised when a method reads an argument that the
sender did not pass, e.g. `args.get-value` in a `deposit` that was sent
without a `value`.

**Fix:** check the spelling of the message, the attribute declarations
of the class and its bases, and the arguments passed.
"#,
    },
    ErrorEntry {
        code: "OOS-M002",
        short: "method access denied",
        long: r#"## OOS-M002: method access denied

The message names a private method or the accessor of a private
attribute, and it was sent from outside the receiving instance.

Private members answer only messages that a method of the same
instance sends to `this`. A readonly attribute has a public getter and
a private setter, so `set-<attr>` from outside raises this error while
`get-<attr>` succeeds.

Nothing is executed when access is denied: the receiver is unchanged.
"#,
    },
    // ── Scopes ───────────────────────────────────────────────────────────────
    ErrorEntry {
        code: "OOS-S001",
        short: "name not defined",
        long: r#"## OOS-S001: name not defined

The receiver name is not bound in any scope frame. Names are looked up
from the innermost frame outwards.

Common causes:

- a typo in the instance name
- `this` or `args` used outside any method
- an instance created inside a method, whose binding disappeared when
  that method returned
- an instance whose constructor failed; its binding is removed
"#,
    },
    // ── Arguments ────────────────────────────────────────────────────────────
    ErrorEntry {
        code: "OOS-A001",
        short: "bad argument",
        long: r#"## OOS-A001: bad argument

An argument has the wrong shape or type. Examples:

- `define` with a `name` that is not a string, or an attribute `kind`
  other than `public`, `private` or `readonly`
- arithmetic between an `int` and a `str`
- integer overflow in `add`, `sub` or `multiply`
- storing a `str` in an `int` box through `set-value`
- sending a message to a list or map, which are not receivers
"#,
    },
    // ── Scripts ──────────────────────────────────────────────────────────────
    ErrorEntry {
        code: "OOS-X001",
        short: "cannot read script",
        long: r#"## OOS-X001: cannot read script

The script file could not be read. Check the path and its permissions.
"#,
    },
    ErrorEntry {
        code: "OOS-X002",
        short: "invalid script",
        long: r#"## OOS-X002: invalid script

The script is not valid JSON or does not have the expected shape. A
script is an object with a `steps` list; each step is one of `define`,
`new`, `send` or `expect_error`.

**Example:**

    {"steps": [
      {"define": {"name": "note", "attrs": ["text"]}},
      {"new": {"cls": "note", "name": "n"}},
      {"send": {"to": "n", "message": "get-text", "print": true}}
    ]}
"#,
    },
    ErrorEntry {
        code: "OOS-X003",
        short: "expectation failed",
        long: r#"## OOS-X003: expectation failed

A `send` step carried an `expect` literal and the unboxed result of the
send was different.
"#,
    },
    ErrorEntry {
        code: "OOS-X004",
        short: "expected error not raised",
        long: r#"## OOS-X004: expected error not raised

An `expect_error` step's send either succeeded, or failed with an
error of a different kind than the one named in `kind`.

Valid kinds: `ClassNotFound`, `ClassAlreadyDefined`, `MethodNotFound`,
`MethodAccessDenied`, `NotDefined`, `BadArgument`.
"#,
    },
];

/// Look up an error entry by code (e.g. `"OOS-M002"`).
pub fn lookup(code: &str) -> Option<&'static ErrorEntry> {
    REGISTRY.iter().find(|e| e.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_code() {
        let e = lookup("OOS-M002").expect("OOS-M002 should be in registry");
        assert_eq!(e.code, "OOS-M002");
        assert!(!e.short.is_empty());
        assert!(e.long.contains("OOS-M002"));
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup("oos-c001").map(|e| e.code), Some("OOS-C001"));
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup("OOS-XXXX").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn all_codes_unique() {
        let mut codes: Vec<&str> = REGISTRY.iter().map(|e| e.code).collect();
        codes.sort_unstable();
        let len_before = codes.len();
        codes.dedup();
        assert_eq!(codes.len(), len_before, "duplicate codes in registry");
    }

    #[test]
    fn all_codes_have_content() {
        for entry in REGISTRY {
            assert!(!entry.short.is_empty(), "{} missing short description", entry.code);
            let heading = format!("## {}", entry.code);
            assert!(entry.long.starts_with(&heading), "{} long text must open with its code", entry.code);
        }
    }
}
