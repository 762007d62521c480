use std::fmt::Arguments;
use std::io::{self, Stdin, Stdout, Write};
use std::thread;

use crossbeam::channel::{self, Receiver};
use log::{debug, Level, RecordBuilder};

pub trait Input {
    /// Reads one line including the newline. An empty string means end of input.
    fn read_line(&mut self) -> io::Result<String>;
}

impl Input for Stdin {
    fn read_line(&mut self) -> io::Result<String> {
        let mut buf = String::new();
        Stdin::read_line(self, &mut buf)?;
        Ok(buf)
    }
}

impl Input for String {
    fn read_line(&mut self) -> io::Result<String> {
        if self.is_empty() {
            return Ok(String::new());
        }

        match self.split_once('\n') {
            None => {
                let mut res = String::new();
                std::mem::swap(&mut res, self);
                res.push('\n');
                Ok(res)
            }
            Some((line, rest)) => {
                let mut res = line.to_string();
                res.push('\n');
                *self = rest.to_string();
                Ok(res)
            }
        }
    }
}

pub trait Output {
    fn write_fmt(&mut self, fmt: Arguments) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

impl Output for Stdout {
    fn write_fmt(&mut self, fmt: Arguments<'_>) -> io::Result<()> {
        Write::write_fmt(self, fmt)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}

impl Output for String {
    fn write_fmt(&mut self, fmt: Arguments<'_>) -> io::Result<()> {
        self.push_str(&std::fmt::format(fmt));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<O: Output> Output for &mut O {
    fn write_fmt(&mut self, fmt: Arguments<'_>) -> io::Result<()> {
        (*self).write_fmt(fmt)
    }

    fn flush(&mut self) -> io::Result<()> {
        (*self).flush()
    }
}

pub struct Logging<T>(pub T);

impl<T: Input> Input for Logging<T> {
    fn read_line(&mut self) -> io::Result<String> {
        self.0.read_line().map(|s| {
            debug!("> {}", s.trim_end());
            s
        })
    }
}

impl<T: Output> Output for Logging<T> {
    fn write_fmt(&mut self, fmt: Arguments) -> io::Result<()> {
        let log_record = RecordBuilder::new().level(Level::Debug).args(fmt).build();
        log::logger().log(&log_record);
        self.0.write_fmt(fmt)
    }

    fn flush(&mut self) -> io::Result<()> {
        log::logger().flush();
        self.0.flush()
    }
}

/// Moves blocking line reads onto their own thread so they can be waited on
/// together with the tick channel. The channel closes after end of input or
/// the first read error, which is forwarded.
pub fn spawn_reader<I>(mut input: I) -> Receiver<io::Result<String>>
where
    I: Input + Send + 'static,
{
    let (tx, rx) = channel::unbounded();
    thread::spawn(move || loop {
        let line = input.read_line();
        let done = !matches!(&line, Ok(l) if !l.is_empty());
        if tx.send(line).is_err() || done {
            break;
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_input_yields_lines_then_end() {
        let mut input = "tap 0\npause".to_string();
        assert_eq!(input.read_line().unwrap(), "tap 0\n");
        assert_eq!(input.read_line().unwrap(), "pause\n");
        assert_eq!(input.read_line().unwrap(), "");
        assert_eq!(input.read_line().unwrap(), "");
    }

    #[test]
    fn reader_closes_after_end_of_input() {
        let rx = spawn_reader("show\nquit\n".to_string());
        let lines: Vec<String> = rx.iter().map(Result::unwrap).collect();
        assert_eq!(lines, ["show\n", "quit\n", ""]);
    }
}
