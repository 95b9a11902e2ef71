#![no_main]

use std::sync::mpsc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use nova_classfile::{SignatureKind, SignatureWalker, SignatureWriter, WalkContext};

mod utils;

const TIMEOUT: Duration = Duration::from_secs(1);

const KINDS: [SignatureKind; 3] = [
    SignatureKind::Class,
    SignatureKind::Method,
    SignatureKind::Field,
];

struct Runner {
    input_tx: mpsc::SyncSender<String>,
    output_rx: Mutex<mpsc::Receiver<()>>,
}

/// Walks `text` as every signature kind. Whatever the walker accepts must be
/// balanced and must be written back verbatim.
fn check(text: &str) {
    for kind in KINDS {
        let mut ctx = WalkContext::new(text, kind);
        let mut events = Vec::new();
        let mut failed = false;
        for event in SignatureWalker::new(text, kind) {
            let Ok(event) = event else {
                failed = true;
                break;
            };
            if ctx.apply(&event).is_err() {
                failed = true;
                break;
            }
            events.push(event);
        }
        if failed {
            continue;
        }
        ctx.finish().expect("accepted signature must be balanced");

        let written = SignatureWriter::write_all(events).expect("accepted events must be writable");
        assert_eq!(written, text, "signature did not round-trip as {kind:?}");
    }
}

fn runner() -> &'static Runner {
    static RUNNER: OnceLock<Runner> = OnceLock::new();
    RUNNER.get_or_init(|| {
        let (input_tx, input_rx) = mpsc::sync_channel::<String>(0);
        let (output_tx, output_rx) = mpsc::sync_channel::<()>(0);

        std::thread::spawn(move || {
            for input in input_rx {
                check(&input);
                let _ = output_tx.send(());
            }
        });

        Runner {
            input_tx,
            output_rx: Mutex::new(output_rx),
        }
    })
}

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    let runner = runner();
    runner
        .input_tx
        .send(text.to_owned())
        .expect("fuzz_signature_walk worker thread exited");

    match runner
        .output_rx
        .lock()
        .expect("fuzz_signature_walk worker receiver poisoned")
        .recv_timeout(TIMEOUT)
    {
        Ok(()) => {}
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("fuzz_signature_walk fuzz target timed out"),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            panic!("fuzz_signature_walk worker thread panicked")
        }
    }
});
