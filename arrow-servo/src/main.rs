use arrow_servo::config::Config;

fn main() {
    // Channels are zeroed and the terminal restored before `run` returns, whatever the outcome.
    if let Err(err) = arrow_servo::run(&Config::default()) {
        eprintln!("\n{}", err);
        eprintln!("Program terminated.");
    }
}
