use anyhow::Result;
use phonenet_switchboard::config::Config;
use phonenet_switchboard::session::{Outcome, Session};
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    let config = Config::new()?;
    let _log_guard = phonenet_log::init(&config.log_level);
    tracing::info!(routing = %config.routing, "phonenet started");

    let mut session = Session::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "{}", session.config().prompt)?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match session.execute(&line) {
            Outcome::Quit => break,
            Outcome::Continue(output) => {
                if !output.is_empty() {
                    writeln!(stdout, "{}", output.trim_end())?;
                }
            }
        }
    }

    Ok(())
}
