use veridoc::cli;
use veridoc::ui::output;

fn main() {
    if let Err(e) = cli::run() {
        output::error(format!("{e:#}"));
        std::process::exit(1);
    }
}
