// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

fn main() {
    process::exit(docscan_bridge::cli::run::main());
}
