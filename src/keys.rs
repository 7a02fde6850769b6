use std::{io::BufRead, thread, time::Duration};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};

const ESC: char = '\u{1b}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Char(char),
}

impl Key {
    pub fn is_cancel(&self) -> bool {
        matches!(self, Key::Escape | Key::Char('q') | Key::Char('Q'))
    }

    /// One key per input line; Esc anywhere in the line wins.
    pub fn from_line(line: &str) -> Option<Key> {
        if line.contains(ESC) {
            return Some(Key::Escape);
        }
        line.trim().chars().next().map(Key::Char)
    }
}

/// Forwards keys typed on stdin (followed by Enter) to the frame loop.
pub fn spawn_stdin_listener() -> Receiver<Key> {
    let (tx, rx) = bounded(8);
    let spawned = thread::Builder::new()
        .name("stdin-keys".into())
        .spawn(move || forward_lines(std::io::stdin().lock(), tx));
    if let Err(err) = spawned {
        log::warn!("cannot listen for keys on stdin: {err}");
    }
    rx
}

fn forward_lines(reader: impl BufRead, tx: Sender<Key>) {
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        if let Some(key) = Key::from_line(&line) {
            if tx.send(key).is_err() {
                break;
            }
        }
    }
}

/// Blocks for at most `timeout` waiting for a key.
pub fn wait_key(keys: &Receiver<Key>, timeout: Duration) -> Option<Key> {
    match keys.recv_timeout(timeout) {
        Ok(key) => Some(key),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => {
            // No listener left; still pace the loop.
            thread::sleep(timeout);
            None
        }
    }
}
