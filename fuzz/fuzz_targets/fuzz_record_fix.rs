#![no_main]

use libfuzzer_sys::fuzz_target;
use nova_classfile::access::{ACC_FINAL, ACC_PRIVATE, ACC_PUBLIC};
use nova_classfile::{validate_signature, ClassStub, FieldStub, MethodStub, SignatureKind, RECORD_BASE};
use nova_records::{InMemoryClassRegistry, RecordFixConfig, RecordFixer};

mod utils;

const DESCRIPTORS: [&str; 4] = [
    "Ljava/lang/Object;",
    "Ljava/lang/Comparable;",
    "Ljava/util/List;",
    "[Ljava/lang/Number;",
];

// Each input line becomes a member signature: lines starting with `(` or `<`
// are attached to methods, everything else to component fields.
fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    let mut class = ClassStub::new("fuzz/Subject", Some(RECORD_BASE));
    for (index, line) in text.lines().take(16).enumerate() {
        let descriptor = DESCRIPTORS[index % DESCRIPTORS.len()];
        if line.starts_with('(') || line.starts_with('<') {
            class.methods.push(
                MethodStub::new(ACC_PUBLIC, format!("m{index}"), format!("({descriptor}){descriptor}"))
                    .with_signature(line),
            );
        } else {
            class.fields.push(
                FieldStub::new(ACC_PRIVATE | ACC_FINAL, format!("f{index}"), descriptor)
                    .with_signature(line),
            );
        }
    }

    let registry = InMemoryClassRegistry::with_minimal_jdk();
    let config = RecordFixConfig::default();
    let fixer = RecordFixer::new(&registry, &config);

    let before = class.clone();
    match fixer.fix(&mut class) {
        Ok(outcome) => {
            if let Some(signature) = &outcome.signature {
                validate_signature(signature, SignatureKind::Class)
                    .expect("rebuilt class signature must re-walk");
            }
            let fixed = class.clone();
            let again = fixer.fix(&mut class).expect("second pass must succeed");
            assert!(again.is_unchanged(), "second pass changed {again:?}");
            assert_eq!(class, fixed);
        }
        Err(_) => assert_eq!(class, before),
    }
});
