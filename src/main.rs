use clap::Parser;
use log::LevelFilter;
use lslice::{read_lines, LineBound, Result, SliceError, DEFAULT_CHUNK_SIZE};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lslice")]
#[command(about = "Print a range of lines from a file, like list slicing")]
struct Args {
    file: PathBuf,

    /// First line to print; negative counts from the end
    #[arg(default_value_t = 0, allow_negative_numbers = true)]
    start: i64,

    /// Line to stop before; negative counts from the end, `none` reads to the end
    #[arg(default_value = "none", allow_negative_numbers = true)]
    end: LineBound,

    /// Bytes per read
    #[arg(default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        if let Some(message) = failure_message(&e) {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let lines = read_lines(&args.file, args.start, args.end, args.chunk_size)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_lines(lines, args.start, &mut out)
}

/// Write each line as `<number> <line>`, numbering from `start`.
fn print_lines<I, W>(lines: I, start: i64, out: &mut W) -> Result<()>
where
    I: IntoIterator<Item = Result<String>>,
    W: Write,
{
    for (num, line) in lines.into_iter().enumerate() {
        let line = line?;
        writeln!(out, "{} {}", start + num as i64, line.trim_end())?;
    }
    out.flush()?;
    Ok(())
}

/// `None` when the reader went away and output should just stop.
fn failure_message(err: &SliceError) -> Option<String> {
    match err {
        SliceError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe => None,
        _ => Some(format!("lslice: {}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["lslice", "words.txt"]).unwrap();
        assert_eq!(args.file, PathBuf::from("words.txt"));
        assert_eq!(args.start, 0);
        assert_eq!(args.end, LineBound::Unbounded);
        assert_eq!(args.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_parse_negative_range() {
        let args = Args::try_parse_from(["lslice", "words.txt", "-220", "-219", "64"]).unwrap();
        assert_eq!(args.start, -220);
        assert_eq!(args.end, LineBound::Bounded(-219));
        assert_eq!(args.chunk_size, 64);
    }

    #[test]
    fn test_parse_open_end() {
        let args = Args::try_parse_from(["lslice", "words.txt", "-2", "none", "3"]).unwrap();
        assert_eq!(args.end, LineBound::Unbounded);
        assert!(Args::try_parse_from(["lslice", "words.txt", "1", "abc"]).is_err());
    }

    fn ok_lines(lines: &[&str]) -> Vec<Result<String>> {
        lines.iter().map(|line| Ok(line.to_string())).collect()
    }

    #[test]
    fn test_print_negative_numbering() {
        let mut out = Vec::new();
        print_lines(ok_lines(&["bb", "ccc"]), -2, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "-2 bb\n-1 ccc\n");
    }

    #[test]
    fn test_print_trims_trailing_whitespace() {
        let mut out = Vec::new();
        print_lines(ok_lines(&["x \r", "  y\t"]), 3, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3 x\n4   y\n");
    }

    #[test]
    fn test_print_stops_on_line_error() {
        let mut out = Vec::new();
        let lines = vec![
            Ok("a".to_string()),
            Err(SliceError::Io(io::Error::new(io::ErrorKind::Other, "gone"))),
            Ok("b".to_string()),
        ];
        assert!(print_lines(lines, 0, &mut out).is_err());
        assert_eq!(String::from_utf8(out).unwrap(), "0 a\n");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_broken_pipe_is_quiet() {
        let err = print_lines(ok_lines(&["a"]), 0, &mut ClosedPipe).unwrap_err();
        assert!(matches!(&err, SliceError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(failure_message(&err), None);
    }

    #[test]
    fn test_failure_message() {
        let err = SliceError::FileNotFound {
            path: "missing.txt".to_string(),
        };
        assert_eq!(
            failure_message(&err),
            Some("lslice: File not found: missing.txt".to_string())
        );
    }
}
