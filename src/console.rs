use std::io::{self, BufRead, IsTerminal, Stdout, Write};

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

/// Line-oriented terminal surface the menu loop talks to.
pub trait Console {
    fn clear(&mut self) -> io::Result<()>;
    /// Writes `text` without a trailing newline, for prompts.
    fn print(&mut self, text: &str) -> io::Result<()>;
    fn println(&mut self, text: &str) -> io::Result<()>;
    /// Reads one line without its terminator. `None` once input is exhausted.
    fn read_line(&mut self) -> io::Result<Option<String>>;
    fn wait_for_key(&mut self) -> io::Result<()>;
}

pub struct TerminalConsole {
    stdout: Stdout,
    clear_screen: bool,
}

impl TerminalConsole {
    pub fn new(clear_screen: bool) -> Self {
        TerminalConsole {
            stdout: io::stdout(),
            clear_screen,
        }
    }

    fn read_key(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let result = loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
                Ok(_) => {}
                Err(err) => break Err(err),
            }
        };
        disable_raw_mode()?;
        result
    }
}

impl Console for TerminalConsole {
    fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        Ok(())
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        write!(self.stdout, "{}", text)?;
        self.stdout.flush()
    }

    fn println(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.stdout, "{}", text)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.stdout.flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn wait_for_key(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        if io::stdin().is_terminal() {
            self.read_key()?;
            writeln!(self.stdout)
        } else {
            // Piped input has no key events; a line stands in for the keypress.
            self.read_line().map(|_| ())
        }
    }
}
