// sandboxed_eval.rs — End-to-end test of the sandbox as the evaluator uses it.
//
// This exercises the complete flow a rendering pass goes through:
//
//   1. Build a rendering context of host values (map, seq, functions,
//      a host object with private state)
//   2. Resolve safe attribute/item expressions → real values
//   3. Resolve private/internal names → undefined sentinels, rendering
//      continues with "missing" semantics
//   4. Invoke a safe function → result forwarded
//   5. Invoke a marked-unsafe function → SecurityViolation surfaced
//   6. Build loops via the bounded range → oversized requests blocked
//   7. Swap in the immutable policy → container mutators disappear too
//
// VERIFY:
//   - No subscribe path ever errors
//   - Denials are security-tagged exactly when the attribute existed
//   - The immutable variant is a strict narrowing of the base variant

use std::collections::BTreeMap;
use std::sync::Arc;

use lattice_sandbox::{mark_unsafe, PolicyVariant, Sandbox};
use lattice_value::{
    AttrLookup, CallArgs, DirectCall, ItemLookup, NativeFunc, Object, Value,
};

/// A host object with a private field and no item namespace — the typical
/// application struct exposed to templates.
#[derive(Debug)]
struct Article {
    title: &'static str,
}

impl Object for Article {
    fn type_name(&self) -> &str {
        "article"
    }

    fn get_attr(&self, name: &str) -> AttrLookup {
        match name {
            "title" => AttrLookup::Found(Value::from(self.title)),
            "_draft_notes" => AttrLookup::Found(Value::from("unpublished")),
            _ => AttrLookup::NotFound,
        }
    }

    fn get_item(&self, _key: &Value) -> ItemLookup {
        ItemLookup::Unsupported
    }
}

fn context() -> BTreeMap<String, Value> {
    let mut ctx = BTreeMap::new();
    ctx.insert(
        "article".to_string(),
        Value::Object(Arc::new(Article { title: "Lattice" })),
    );
    ctx.insert(
        "tags".to_string(),
        Value::from(vec![Value::from("rust"), Value::from("templates")]),
    );
    let mut settings = BTreeMap::new();
    settings.insert("theme".to_string(), Value::from("dark"));
    ctx.insert("settings".to_string(), Value::from(settings));
    ctx.insert(
        "shout".to_string(),
        Value::from(NativeFunc::new("shout", |args: &CallArgs| {
            let text = args
                .positional
                .first()
                .and_then(|v| v.as_str())
                .unwrap_or("");
            Ok(Value::from(format!("{}!", text.to_uppercase())))
        })),
    );
    ctx.insert(
        "purge".to_string(),
        mark_unsafe(Value::from(NativeFunc::new("purge", |_| Ok(Value::None)))),
    );
    ctx
}

#[test]
fn full_render_pass_through_the_sandbox() {
    let sandbox = Sandbox::new(PolicyVariant::Base);
    let ctx = context();

    // ── Safe resolution paths ──
    let article = &ctx["article"];
    assert_eq!(
        sandbox.subscribe(article, &Value::from("title")),
        Value::from("Lattice")
    );
    assert_eq!(
        sandbox.subscribe(&ctx["tags"], &Value::from(0)),
        Value::from("rust")
    );
    assert_eq!(
        sandbox.subscribe(&ctx["settings"], &Value::from("theme")),
        Value::from("dark")
    );

    // ── Denied attribute: exists on the object, so the miss is tagged ──
    let denied = sandbox.subscribe(article, &Value::from("_draft_notes"));
    match &denied {
        Value::Undefined(und) => {
            assert!(und.is_security_denial());
            assert_eq!(und.name.as_deref(), Some("_draft_notes"));
        }
        other => panic!("expected undefined, got {:?}", other),
    }
    // Rendering treats it as absent: falsy and empty.
    assert!(!denied.is_true());
    assert_eq!(denied.to_string(), "");

    // ── Plain miss: no security implication ──
    let missing = sandbox.subscribe(article, &Value::from("subtitle"));
    match &missing {
        Value::Undefined(und) => assert!(!und.is_security_denial()),
        other => panic!("expected undefined, got {:?}", other),
    }

    // ── Safe call delegates and forwards the result ──
    let out = sandbox
        .call(
            &DirectCall,
            &ctx["shout"],
            &CallArgs::positional([Value::from("hello")]),
        )
        .unwrap();
    assert_eq!(out, Value::from("HELLO!"));

    // ── Blocked call is a loud error, never a sentinel ──
    let err = sandbox
        .call(&DirectCall, &ctx["purge"], &CallArgs::default())
        .unwrap_err();
    assert!(err.is_security_violation());

    // ── Bounded loops ──
    let range = sandbox
        .range(&[Value::from(0), Value::from(3)])
        .unwrap();
    assert_eq!(range.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert!(sandbox
        .range(&[Value::from(0), Value::from(100_001)])
        .is_err());
}

#[test]
fn immutable_variant_narrows_base() {
    let base = Sandbox::new(PolicyVariant::Base);
    let immutable = Sandbox::new(PolicyVariant::Immutable);
    let ctx = context();

    let attrs = [
        "keys", "values", "items", "get", "clear", "pop", "update", "_x", "__class__",
    ];
    for attr in attrs {
        let target = &ctx["settings"];
        let value = match target.get_attr(attr) {
            AttrLookup::Found(v) => v,
            AttrLookup::NotFound => Value::None,
        };
        let base_safe = base.is_safe_attribute(target, attr, &value);
        let immutable_safe = immutable.is_safe_attribute(target, attr, &value);
        // Strict narrowing: the immutable policy never re-allows.
        if !base_safe {
            assert!(!immutable_safe, "immutable re-allowed {attr}");
        }
    }

    // The observable difference: mapping mutators.
    let value = Value::None;
    assert!(base.is_safe_attribute(&ctx["settings"], "clear", &value));
    assert!(!immutable.is_safe_attribute(&ctx["settings"], "clear", &value));

    // Read-only access is identical under both.
    assert_eq!(
        immutable.subscribe(&ctx["settings"], &Value::from("theme")),
        Value::from("dark")
    );
}
