use clap::Parser;
use core::fmt;
use std::{fs, io};
use interbank_parser::{
    error,
    types::{Field, SupportedFormat},
};

#[derive(Debug)]
enum Error {
    Parse(String),
    Usage(String),
    IO(String),
}

impl Error {
    fn code(&self) -> i32 {
        match self {
            Self::Parse(_) => 1,
            Self::Usage(_) => 3,
            Self::IO(_) => 4,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) | Self::Usage(msg) => write!(f, "{}", msg),
            Self::IO(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl From<error::ParseError> for Error {
    fn from(value: error::ParseError) -> Self {
        match value {
            error::ParseError::IOError(msg) => Error::IO(msg),
            error::ParseError::InvalidFormat(msg) => Error::Parse(msg),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IO(err.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the first message
    #[arg(long, required = true)]
    file1: String,

    /// Format of the first message: chips/fedwire/swift
    #[arg(long, required = true)]
    format1: String,

    /// Path to the second message
    #[arg(long, required = true)]
    file2: String,

    /// Format of the second message: chips/fedwire/swift
    #[arg(long, required = true)]
    format2: String,
}

// Сравнивает два списка полей по тегу и значению.
// Возвращает либо:
// - None, если списки совпадают
// - (index, Option<&'a Field>, Option<&'a Field>) первой несовпавшей пары полей
fn compare<'a>(
    lhs: &'a [Field],
    rhs: &'a [Field],
) -> Option<(usize, Option<&'a Field>, Option<&'a Field>)> {
    for i in 0..std::cmp::max(lhs.len(), rhs.len()) {
        let l = lhs.get(i);
        let r = rhs.get(i);
        match (l, r) {
            (Some(a), Some(b)) if a.tag() == b.tag() && a.value() == b.value() => continue,
            _ => return Some((i, l, r)),
        }
    }
    None
}

fn describe(field: Option<&Field>) -> String {
    match field {
        Some(f) => format!("{} = {:?}", f.tag(), f.value()),
        None => "<нет поля>".to_string(),
    }
}

fn parse_file(path: &str, format: &str, n: usize) -> Result<Vec<Field>, Error> {
    let Ok(format) = format.parse::<SupportedFormat>() else {
        return Err(Error::Usage(format!("невалидный формат файла {}: {}", n, format)));
    };

    let mut file = fs::File::open(path)
        .map_err(|err| Error::IO(format!("невозможно открыть файл {}\n:{}", path, err)))?;

    let parsed = interbank_parser::parse(&mut file, format)?;
    for message in parsed.error_messages() {
        log::warn!("{}: {}", path, message);
    }
    Ok(parsed.fields().to_vec())
}

fn run() -> Result<(), Error> {
    let args = Args::parse();

    let fields1 = parse_file(&args.file1, &args.format1, 1)?;
    let fields2 = parse_file(&args.file2, &args.format2, 2)?;

    match compare(&fields1, &fields2) {
        Some((index, lhs, rhs)) => {
            println!("Наборы полей не идентичны!");
            println!("Несовпали поля на позиции {}", index + 1);
            println!("LHS: {}\nRHS: {}", describe(lhs), describe(rhs));
        }
        None => println!("Наборы полей идентичны!"),
    }
    Ok(())
}

fn main() {
    env_logger::init();

    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.code());
        }
    }
}
