//! Diagnostic logging for the evaluator itself.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_tree::HierarchicalLayer;

/// Install a hierarchical `tracing` subscriber.
///
/// Does nothing unless `VLANG_LOG` or `RUST_LOG` is set; `VLANG_LOG` wins
/// when both are. Example: `VLANG_LOG=vlang_eval=debug vlang run demo.v`.
pub fn init_tracing() {
    let Ok(directives) = std::env::var("VLANG_LOG").or_else(|_| std::env::var("RUST_LOG")) else {
        return;
    };
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|error| {
        eprintln!("warning: ignoring invalid log filter '{directives}': {error}");
        EnvFilter::new("warn")
    });
    let tree = HierarchicalLayer::new(2)
        .with_targets(true)
        .with_bracketed_fields(true)
        .with_writer(std::io::stderr);
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::registry().with(filter).with(tree).try_init();
}
