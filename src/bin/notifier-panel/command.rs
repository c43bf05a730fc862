use notifier_panel::{api::data::NotificationId, submit::Form};

pub const USAGE: &str = "\
commands:
  send <chat_id> <time|-> <message...>   schedule a notification ('-' sends now)
  status <id>                            show the status of a notification
  cancel <id>                            delete a notification
  quit";

const SEND_USAGE: &str = "usage: send <chat_id> <time|-> <message...>";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Send(Form),
    Status(NotificationId),
    Cancel(NotificationId),
    Quit,
}

impl Command {
    /// `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (head, tail) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let tail = tail.trim_start();

        let cmd = match head {
            "send" => {
                let Some((chat_id, rest)) = next_word(tail) else {
                    return Err(SEND_USAGE.into());
                };
                let Some((time, message)) = next_word(rest) else {
                    return Err(SEND_USAGE.into());
                };
                if message.is_empty() {
                    return Err(SEND_USAGE.into());
                }

                Self::Send(Form {
                    chat_id: chat_id.to_string(),
                    message: message.to_string(),
                    time: if time == "-" { String::new() } else { time.to_string() },
                })
            }
            "status" | "cancel" if tail.is_empty() => return Err(format!("usage: {head} <id>")),
            "status" => Self::Status(NotificationId::new(tail)),
            "cancel" => Self::Cancel(NotificationId::new(tail)),
            "quit" | "exit" => Self::Quit,
            unknown => return Err(format!("unknown command: '{unknown}'")),
        };

        Ok(Some(cmd))
    }
}

/// Splits off the first word. The rest has its leading whitespace removed.
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    let (word, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    Some((word, rest.trim_start()))
}
