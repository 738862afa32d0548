//! # interbank_parser
//!
//! Библиотека для разбора межбанковских сообщений из их текстового
//! представления в структурированные объекты.
//!
//! Поддерживаются три формата:
//! * **CHIPS** - поля вида `[260] 000220769618`
//! * **FedWire** - поля вида `{2000}000000000100`
//! * **SWIFT MT** - блоки `{1:}`..`{5:}`, поля блока 4 вида `:32A:...`
//!
//! Разбор не останавливается на первой ошибке: каждый найденный дефект
//! записывается в список ошибок результата, а сообщение собирается, если это
//! вообще возможно.
//!
//! ## Быстрый старт
//!
//! ```rust
//! use interbank_parser::{parse_from_swift, swift_blocks::BankIdentifier};
//!
//! let text = "{1:F01ABCDUS10AXXX0000000000}{2:I202MNOPUS40HXYZX}{4:\r\n\
//!             :20:101101012345678A\r\n\
//!             :32A:101101USD10100,50\r\n\
//!             -}";
//!
//! let result = parse_from_swift(text);
//! assert!(result.errors().is_empty());
//!
//! let message = result.message().expect("Сообщение не разобрано");
//! assert_eq!(message.mt(), "202");
//! assert_eq!(message.sender().bic11(), "ABCDUS10XXX");
//! assert_eq!(message.field("32A"), Some("101101USD10100,50"));
//!
//! // Обратный вывод совпадает с исходным текстом байт в байт
//! assert_eq!(message.to_string(), text);
//! ```
//!
//! ## Обработка ошибок
//! Дефекты содержимого сообщения возвращаются в [`types::ParseResult`] как список
//! [`error::Diagnostic`]. Ошибки ввода-вывода вокруг разбора имеют типы
//! [`error::ParseError`] и [`error::DumpError`].

pub mod error;
pub mod lookup;
pub mod swift_blocks;
pub mod tokenizer;
pub mod types;
pub mod validator;

mod chips_format;
mod fedwire_format;
mod parser;
mod swift_format;
mod utils;

pub use chips_format::{ChipsMessage, parse_from_chips};
pub use fedwire_format::{FedWireIdentifier, FedWireMessage, parse_from_fedwire};
pub use parser::{ParseReport, ParsedMessage, dump, parse, parse_text};
pub use swift_format::{SwiftMessage, parse_from_swift};
