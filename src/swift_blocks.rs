//! Декодеры отдельных блоков SWIFT-сообщения.
//!
//! ```text
//! {1:F01ABCDUS10AXXX0000000000}        блок 1, заголовок с фиксированными смещениями
//! {2:I202MNOPUS40HXYZX}                блок 2, входящий (I) или исходящий (O)
//! {3:{108:101101C9010F99}}             блок 3, вложенные пары {tag:value}
//! {4:\r\n:20:...\r\n-}                 блок 4, тегированные поля
//! {5:{MAC:41720873}{CHK:123456789ABC}} блок 5, как блок 3
//! ```
//!
//! Каждый декодер принимает содержимое блока без `{n:` и закрывающей скобки
//! и умеет вывести его обратно в исходном виде.

use core::fmt;

use crate::error::{Diagnostic, FramingError};
use crate::tokenizer::{TagSyntax, tokenize};
use crate::types::{Field, FieldKind, FieldSet, LINE_SEPARATOR};
use crate::utils::pad_to;

/// Общий интерфейс всех блоков сообщения.
pub trait SwiftBlock {
    fn number(&self) -> u8;

    /// Содержимое блока без обрамления.
    fn contents(&self) -> String;

    /// Блок целиком, как он выглядит в сообщении.
    fn formatted_block(&self) -> String {
        format!("{{{}:{}}}", self.number(), self.contents())
    }
}

/// Банковский идентификатор из заголовка (блок 1 или блок 2).
pub trait BankIdentifier {
    fn bic8(&self) -> &str;
    /// Логический терминал.
    fn lt(&self) -> char;
    fn branch(&self) -> &str;

    fn bic11(&self) -> String {
        format!("{}{}", self.bic8(), self.branch())
    }

    fn bic12(&self) -> String {
        format!("{}{}{}", self.bic8(), self.lt(), self.branch())
    }
}

/// Направление сообщения, первый символ блока 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn as_char(self) -> char {
        match self {
            Direction::Input => 'I',
            Direction::Output => 'O',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Нарезка заголовка по фиксированным смещениям.
struct HeaderSlicer<'a> {
    text: &'a str,
    block: u8,
}

impl<'a> HeaderSlicer<'a> {
    fn slice(&self, from: usize, to: usize, field: &'static str) -> Result<&'a str, FramingError> {
        self.text
            .get(from..to)
            .ok_or(FramingError::HeaderTooShort {
                block: self.block,
                field,
            })
    }

    fn char_at(&self, at: usize, field: &'static str) -> Result<char, FramingError> {
        self.slice(at, at + 1, field)?
            .chars()
            .next()
            .ok_or(FramingError::HeaderTooShort {
                block: self.block,
                field,
            })
    }
}

/// Basic header, блок 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block1 {
    pub app_id: char,
    pub service_id: String,
    bic8: String,
    lt: char,
    branch: String,
    pub session: String,
    pub sequence: String,
}

impl Block1 {
    pub fn decode(contents: &str) -> Result<Self, FramingError> {
        let s = HeaderSlicer {
            text: contents,
            block: 1,
        };
        Ok(Block1 {
            app_id: s.char_at(0, "application id")?,
            service_id: s.slice(1, 3, "service id")?.to_string(),
            bic8: s.slice(3, 11, "BIC")?.to_string(),
            lt: s.char_at(11, "logical terminal")?,
            branch: s.slice(12, 15, "branch")?.to_string(),
            session: s.slice(15, 19, "session number")?.to_string(),
            sequence: s.slice(19, 25, "sequence number")?.to_string(),
        })
    }
}

impl BankIdentifier for Block1 {
    fn bic8(&self) -> &str {
        &self.bic8
    }

    fn lt(&self) -> char {
        self.lt
    }

    fn branch(&self) -> &str {
        &self.branch
    }
}

impl SwiftBlock for Block1 {
    fn number(&self) -> u8 {
        1
    }

    fn contents(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.app_id,
            self.service_id,
            self.bic12(),
            self.session,
            self.sequence
        )
    }
}

/// Application header входящего сообщения (`I`).
///
/// Необязательные хвостовые поля распознаются только по длине исходного
/// содержимого: код мониторинга при длине от 18 символов, срок устаревания
/// при длине от 21. Содержимое длиной 19-20 символов теряет неполный срок
/// устаревания при обратном выводе.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block2Inbound {
    pub mt: String,
    bic8: String,
    lt: char,
    branch: String,
    pub priority: Option<char>,
    pub monitoring: Option<char>,
    pub obsolescence: Option<String>,
}

impl Block2Inbound {
    const MIN_LEN: usize = 18;

    pub fn decode(contents: &str) -> Result<Self, FramingError> {
        let len = contents.chars().count();
        let padded = pad_to(contents, Self::MIN_LEN, 'X');
        let s = HeaderSlicer {
            text: &*padded,
            block: 2,
        };
        Ok(Block2Inbound {
            mt: s.slice(1, 4, "message type")?.to_string(),
            bic8: s.slice(4, 12, "BIC")?.to_string(),
            lt: s.char_at(12, "logical terminal")?,
            branch: s.slice(13, 16, "branch")?.to_string(),
            priority: if len > 16 {
                Some(s.char_at(16, "priority")?)
            } else {
                None
            },
            monitoring: if len >= 18 {
                Some(s.char_at(17, "monitoring")?)
            } else {
                None
            },
            obsolescence: if len >= 21 {
                Some(s.slice(18, 21, "obsolescence period")?.to_string())
            } else {
                None
            },
        })
    }
}

impl BankIdentifier for Block2Inbound {
    fn bic8(&self) -> &str {
        &self.bic8
    }

    fn lt(&self) -> char {
        self.lt
    }

    fn branch(&self) -> &str {
        &self.branch
    }
}

impl SwiftBlock for Block2Inbound {
    fn number(&self) -> u8 {
        2
    }

    fn contents(&self) -> String {
        let mut out = format!("I{}{}", self.mt, self.bic12());
        if let Some(priority) = self.priority {
            out.push(priority);
        }
        if let Some(monitoring) = self.monitoring {
            out.push(monitoring);
            if let Some(obsolescence) = &self.obsolescence {
                out.push_str(obsolescence);
            }
        }
        out
    }
}

/// Application header исходящего сообщения (`O`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block2Outbound {
    pub mt: String,
    pub input_time: String,
    pub input_date: String,
    bic8: String,
    lt: char,
    branch: String,
    pub session: String,
    pub sequence: String,
    pub output_date: String,
    pub output_time: String,
    pub priority: Option<char>,
}

impl Block2Outbound {
    const MIN_LEN: usize = 47;

    pub fn decode(contents: &str) -> Result<Self, FramingError> {
        let len = contents.chars().count();
        let padded = pad_to(contents, Self::MIN_LEN, 'X');
        let s = HeaderSlicer {
            text: &*padded,
            block: 2,
        };
        Ok(Block2Outbound {
            mt: s.slice(1, 4, "message type")?.to_string(),
            input_time: s.slice(4, 8, "input time")?.to_string(),
            input_date: s.slice(8, 14, "input date")?.to_string(),
            bic8: s.slice(14, 22, "BIC")?.to_string(),
            lt: s.char_at(22, "logical terminal")?,
            branch: s.slice(23, 26, "branch")?.to_string(),
            session: s.slice(26, 30, "session number")?.to_string(),
            sequence: s.slice(30, 36, "sequence number")?.to_string(),
            output_date: s.slice(36, 42, "output date")?.to_string(),
            output_time: s.slice(42, 46, "output time")?.to_string(),
            priority: if len >= Self::MIN_LEN {
                Some(s.char_at(46, "priority")?)
            } else {
                None
            },
        })
    }
}

impl BankIdentifier for Block2Outbound {
    fn bic8(&self) -> &str {
        &self.bic8
    }

    fn lt(&self) -> char {
        self.lt
    }

    fn branch(&self) -> &str {
        &self.branch
    }
}

impl SwiftBlock for Block2Outbound {
    fn number(&self) -> u8 {
        2
    }

    fn contents(&self) -> String {
        let mut out = format!(
            "O{}{}{}{}{}{}{}{}",
            self.mt,
            self.input_time,
            self.input_date,
            self.bic12(),
            self.session,
            self.sequence,
            self.output_date,
            self.output_time
        );
        if let Some(priority) = self.priority {
            out.push(priority);
        }
        out
    }
}

/// Блок 2 в одном из двух взаимоисключающих вариантов.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block2 {
    Inbound(Block2Inbound),
    Outbound(Block2Outbound),
}

impl Block2 {
    /// Выбирает вариант по первому символу содержимого.
    pub fn decode(contents: &str) -> Result<Self, FramingError> {
        match contents.chars().next() {
            Some('I') => Ok(Block2::Inbound(Block2Inbound::decode(contents)?)),
            Some('O') => Ok(Block2::Outbound(Block2Outbound::decode(contents)?)),
            _ => Err(FramingError::InvalidDirection),
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Block2::Inbound(_) => Direction::Input,
            Block2::Outbound(_) => Direction::Output,
        }
    }

    pub fn mt(&self) -> &str {
        match self {
            Block2::Inbound(b) => &b.mt,
            Block2::Outbound(b) => &b.mt,
        }
    }

    pub fn inbound(&self) -> Option<&Block2Inbound> {
        match self {
            Block2::Inbound(b) => Some(b),
            Block2::Outbound(_) => None,
        }
    }

    pub fn outbound(&self) -> Option<&Block2Outbound> {
        match self {
            Block2::Outbound(b) => Some(b),
            Block2::Inbound(_) => None,
        }
    }
}

impl BankIdentifier for Block2 {
    fn bic8(&self) -> &str {
        match self {
            Block2::Inbound(b) => b.bic8(),
            Block2::Outbound(b) => b.bic8(),
        }
    }

    fn lt(&self) -> char {
        match self {
            Block2::Inbound(b) => b.lt(),
            Block2::Outbound(b) => b.lt(),
        }
    }

    fn branch(&self) -> &str {
        match self {
            Block2::Inbound(b) => b.branch(),
            Block2::Outbound(b) => b.branch(),
        }
    }
}

impl SwiftBlock for Block2 {
    fn number(&self) -> u8 {
        2
    }

    fn contents(&self) -> String {
        match self {
            Block2::Inbound(b) => b.contents(),
            Block2::Outbound(b) => b.contents(),
        }
    }
}

/// Блок из вложенных пар `{tag:value}`. Так устроены блоки 3 и 5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBlock {
    number: u8,
    fields: Vec<Field>,
}

impl TagBlock {
    /// Сегменты без закрывающей `}` пропускаются.
    pub fn decode(number: u8, contents: &str) -> Self {
        let fields = contents
            .split('{')
            .map(str::trim)
            .filter_map(|segment| segment.strip_suffix('}'))
            .map(|segment| {
                let segment = segment.trim();
                let (tag, value) = segment.split_once(':').unwrap_or((segment, ""));
                Field::new(FieldKind::Swift, tag.trim(), value.trim())
            })
            .collect();
        TagBlock { number, fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.tag() == tag)
            .map(Field::value)
    }
}

impl SwiftBlock for TagBlock {
    fn number(&self) -> u8 {
        self.number
    }

    fn contents(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{{{}:{}}}", f.tag(), f.value()))
            .collect()
    }
}

/// Text block, блок 4.
///
/// Повторяющиеся теги здесь нормальны (последовательности `16R`/`16S`),
/// поэтому о повторах не сообщается.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block4 {
    fields: FieldSet,
}

impl Block4 {
    /// Номера строк в диагностиках считаются от первой строки после `{4:\r\n`,
    /// а не от начала сообщения.
    pub fn decode(contents: &str, errors: &mut Vec<Diagnostic>) -> Self {
        let fields = tokenize(contents, &TagSyntax::SWIFT_BLOCK4, errors);
        Block4 {
            fields: FieldSet::new(fields),
        }
    }

    pub fn fields(&self) -> &[Field] {
        self.fields.fields()
    }

    /// Значение первого поля с тегом.
    pub fn field(&self, tag: &str) -> Option<&str> {
        self.fields.get(tag).map(Field::value)
    }

    /// Значения всех полей с тегом в порядке появления.
    pub fn fields_with_tag<'a>(&'a self, tag: &'a str) -> Vec<&'a str> {
        self.fields.all(tag).map(Field::value).collect()
    }
}

impl SwiftBlock for Block4 {
    fn number(&self) -> u8 {
        4
    }

    fn contents(&self) -> String {
        self.fields.render(LINE_SEPARATOR)
    }

    fn formatted_block(&self) -> String {
        format!("{{4:{sep}{}{sep}-}}", self.contents(), sep = LINE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block1_decode_and_render() {
        let block = Block1::decode("F01ABCDUS10AXXX0000000000").unwrap();
        assert_eq!(block.app_id, 'F');
        assert_eq!(block.service_id, "01");
        assert_eq!(block.bic8(), "ABCDUS10");
        assert_eq!(block.bic11(), "ABCDUS10XXX");
        assert_eq!(block.bic12(), "ABCDUS10AXXX");
        assert_eq!(block.session, "0000");
        assert_eq!(block.sequence, "000000");
        assert_eq!(block.formatted_block(), "{1:F01ABCDUS10AXXX0000000000}");
    }

    #[test]
    fn test_block1_too_short() {
        assert_eq!(
            Block1::decode("F01ABCDUS10AXXX00"),
            Err(FramingError::HeaderTooShort {
                block: 1,
                field: "session number"
            })
        );
    }

    #[test]
    fn test_block2_inbound_without_trailers() {
        let block = Block2::decode("I202MNOPUS40HXYZX").unwrap();
        assert_eq!(block.direction(), Direction::Input);
        assert_eq!(block.mt(), "202");
        assert_eq!(block.bic12(), "MNOPUS40HXYZ");
        let inbound = block.inbound().unwrap();
        assert_eq!(inbound.priority, Some('X'));
        assert_eq!(inbound.monitoring, None);
        assert_eq!(block.contents(), "I202MNOPUS40HXYZX");
    }

    #[test]
    fn test_block2_inbound_trailer_thresholds() {
        let monitored = Block2Inbound::decode("I103BANKDEFFXXXXU3").unwrap();
        assert_eq!(monitored.monitoring, Some('3'));
        assert_eq!(monitored.obsolescence, None);
        assert_eq!(monitored.contents(), "I103BANKDEFFXXXXU3");

        let full = Block2Inbound::decode("I103BANKDEFFXXXXU3003").unwrap();
        assert_eq!(full.obsolescence.as_deref(), Some("003"));
        assert_eq!(full.contents(), "I103BANKDEFFXXXXU3003");
    }

    #[test]
    fn test_block2_outbound() {
        let block = Block2::decode("O1910953101130WXYZHK10AXXX36030001231011300045N").unwrap();
        let outbound = block.outbound().unwrap();
        assert_eq!(outbound.mt, "191");
        assert_eq!(outbound.input_time, "0953");
        assert_eq!(outbound.input_date, "101130");
        assert_eq!(outbound.session, "3603");
        assert_eq!(outbound.sequence, "000123");
        assert_eq!(outbound.output_date, "101130");
        assert_eq!(outbound.output_time, "0045");
        assert_eq!(outbound.priority, Some('N'));
        assert_eq!(block.bic11(), "WXYZHK10XXX");
        assert_eq!(
            block.formatted_block(),
            "{2:O1910953101130WXYZHK10AXXX36030001231011300045N}"
        );
    }

    #[test]
    fn test_block2_invalid_direction() {
        assert_eq!(
            Block2::decode("X202MNOPUS40HXYZX"),
            Err(FramingError::InvalidDirection)
        );
        assert_eq!(Block2::decode(""), Err(FramingError::InvalidDirection));
    }

    #[test]
    fn test_tag_block() {
        let block = TagBlock::decode(3, "{108:101101C9010F99}");
        assert_eq!(block.fields().len(), 1);
        assert_eq!(block.fields()[0].tag(), "108");
        assert_eq!(block.field("108"), Some("101101C9010F99"));
        assert_eq!(block.formatted_block(), "{3:{108:101101C9010F99}}");

        let trailer = TagBlock::decode(5, "{MAC:41720873}{CHK:123456789ABC}{PDE}{BROKEN");
        assert_eq!(trailer.fields().len(), 3);
        assert_eq!(trailer.field("CHK"), Some("123456789ABC"));
        assert_eq!(trailer.field("PDE"), Some(""));
    }

    #[test]
    fn test_block4_repeated_tags() {
        let mut errors = Vec::new();
        let block = Block4::decode(":16R:GENL\r\n:16S:GENL\r\n:16R:AMT\r\n:16S:AMT", &mut errors);
        assert!(errors.is_empty());
        assert_eq!(block.field("16R"), Some("GENL"));
        assert_eq!(block.fields_with_tag("16R"), vec!["GENL", "AMT"]);
        assert_eq!(
            block.formatted_block(),
            "{4:\r\n:16R:GENL\r\n:16S:GENL\r\n:16R:AMT\r\n:16S:AMT\r\n-}"
        );
    }
}
