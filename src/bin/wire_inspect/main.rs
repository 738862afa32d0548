use std::{fmt, fs, io};

use clap::Parser;
use interbank_parser::{error, types, ParsedMessage};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Путь до файла с сообщением
    #[arg(long, required = true)]
    input_file: String,

    /// Формат сообщения: chips/fedwire/swift
    #[arg(long, required = true)]
    format: KnownFormat,

    /// Вывести восстановленный текст сообщения
    #[arg(long)]
    render: bool,

    /// Вывести отчёт в JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum KnownFormat {
    Chips,
    Fedwire,
    Swift,
}

impl KnownFormat {
    fn as_supported(&self) -> types::SupportedFormat {
        match self {
            KnownFormat::Chips => types::SupportedFormat::Chips,
            KnownFormat::Fedwire => types::SupportedFormat::FedWire,
            KnownFormat::Swift => types::SupportedFormat::Swift,
        }
    }
}

#[derive(Debug)]
enum Error {
    Parse(String),
    Dump(String),
    IO(String),
}

impl Error {
    fn code(&self) -> i32 {
        match self {
            Self::Parse(_) => 1,
            Self::Dump(_) => 2,
            Self::IO(_) => 4,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) | Self::Dump(msg) => write!(f, "{}", msg),
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

impl From<error::DumpError> for Error {
    fn from(value: error::DumpError) -> Self {
        Error::Dump(value.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IO(format!("ошибка ввода-вывода: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Dump(format!("ошибка сериализации отчёта: {}", err))
    }
}

fn print_summary(parsed: &ParsedMessage) {
    println!("Формат: {}", parsed.format());
    println!("Сообщение разобрано: {}", if parsed.has_message() { "да" } else { "нет" });
    println!("Полей: {}", parsed.fields().len());
    for field in parsed.fields() {
        println!("  {}", field);
    }
    println!("Ошибок: {}", parsed.errors().len());
    for message in parsed.error_messages() {
        println!("  {}", message);
    }
}

fn run() -> Result<(), Error> {
    let args = Args::parse();

    let mut input_file = fs::File::open(&args.input_file).map_err(|err| {
        Error::IO(format!("невозможно открыть файл {}\n:{}", &args.input_file, err))
    })?;

    let parsed = interbank_parser::parse(&mut input_file, args.format.as_supported())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed.report())?);
    } else if args.render {
        let mut stdout = io::stdout();
        interbank_parser::dump(&mut stdout, &parsed)?;
        println!();
    } else {
        print_summary(&parsed);
    }

    if !parsed.has_message() {
        return Err(Error::Parse(format!(
            "сообщение {} не удалось разобрать",
            args.input_file
        )));
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
