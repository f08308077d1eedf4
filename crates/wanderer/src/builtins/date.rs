//! Date builtin - display the current date and time

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};

use super::{Builtin, Context};
use crate::error::Result;

/// Format used when none is given.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The date builtin.
///
/// Usage: date [-u] [+FORMAT]
///
/// Options:
///   -u       Display UTC time instead of local time
///
/// FORMAT specifiers:
///   %Y  Year with century (e.g., 2024)
///   %m  Month (01-12)
///   %d  Day of month (01-31)
///   %H  Hour (00-23)
///   %M  Minute (00-59)
///   %S  Second (00-59)
///   %%  Literal %
///
/// Any other text, including unknown `%` sequences, is copied unchanged.
pub struct Date;

impl Builtin for Date {
    fn execute(&self, ctx: Context<'_>) -> Result<String> {
        let mut utc = false;
        let mut words = Vec::new();
        for arg in ctx.args {
            if arg == "-u" && words.is_empty() {
                utc = true;
            } else {
                words.push(arg.as_str());
            }
        }

        let joined = words.join(" ");
        let format = match joined.strip_prefix('+').unwrap_or(&joined) {
            "" => DEFAULT_DATE_FORMAT,
            format => format,
        };

        if utc {
            Ok(format_date(format, &Utc::now()))
        } else {
            Ok(format_date(format, &Local::now()))
        }
    }
}

/// Substitute the supported `%` tokens in `format` against `now`.
pub fn format_date<Tz: TimeZone>(format: &str, now: &DateTime<Tz>) -> String {
    let mut output = String::with_capacity(format.len() + 8);
    let mut chars = format.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            output.push(ch);
            continue;
        }
        let field = match chars.peek() {
            Some('Y') => format!("{:04}", now.year()),
            Some('m') => format!("{:02}", now.month()),
            Some('d') => format!("{:02}", now.day()),
            Some('H') => format!("{:02}", now.hour()),
            Some('M') => format!("{:02}", now.minute()),
            Some('S') => format!("{:02}", now.second()),
            Some('%') => "%".to_string(),
            _ => {
                output.push('%');
                continue;
            }
        };
        chars.next();
        output.push_str(&field);
    }

    output
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builtins::testing::{run, test_fs};
    use crate::process::ProcessTable;
    use pretty_assertions::assert_eq;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap()
    }

    fn run_date(args: &[&str]) -> String {
        let mut fs = test_fs();
        let mut procs = ProcessTable::new();
        run(&Date, "date", &mut fs, &mut procs, args).unwrap()
    }

    #[test]
    fn test_default_format() {
        assert_eq!(format_date(DEFAULT_DATE_FORMAT, &fixed()), "2024-03-07 09:05:02");
    }

    #[test]
    fn test_literal_text_and_unknown_tokens() {
        assert_eq!(format_date("year %Y!", &fixed()), "year 2024!");
        assert_eq!(format_date("%q %% %", &fixed()), "%q % %");
    }

    #[test]
    fn test_builtin_default_shape() {
        let out = run_date(&["-u"]);
        assert_eq!(out.len(), "YYYY-MM-DD HH:MM:SS".len());
        assert_eq!(&out[4..5], "-");
    }

    #[test]
    fn test_builtin_custom_format() {
        let out = run_date(&["-u", "+%Y"]);
        assert_eq!(out, Utc::now().year().to_string());

        let out = run_date(&["year", "%Y"]);
        assert!(out.starts_with("year "));
    }
}
