//! Разбор SWIFT MT сообщений.
//!
//! Сообщение состоит из пяти блоков верхнего уровня:
//!
//! ```text
//! {1:...}{2:...}{3:...}{4:\r\n...\r\n-}{5:...}
//! ```
//!
//! Блоки 3 и 5 необязательны. Перед сообщением может стоять заголовок
//! подтверждения ACK/UAK (`{1:F21...}` или `{1:F31...}`), он отбрасывается.
//!
//! Разбор идёт как конечный автомат [`FramerState`]: поиск блока 1, проверка
//! количества, терминатора и порядка блоков, нарезка и декодирование. Любой
//! фатальный дефект переводит автомат в [`FramerState::Failed`], и результат
//! остаётся без сообщения.

use core::fmt;

use log::{debug, warn};

use crate::error::{Diagnostic, FramingError};
use crate::parser::MessageParser;
use crate::swift_blocks::{BankIdentifier, Block1, Block2, Block4, Direction, SwiftBlock, TagBlock};
use crate::types::{Field, ParseResult};
use crate::utils::count_matches;

const ACK_PREFIXES: [&str; 2] = ["{1:F21", "{1:F31"];
const MESSAGE_BLOCK1: &str = "{1:F01";
const TERMINATOR: &str = "-}";

/// Состояния разбора SWIFT-сообщения.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramerState {
    Scanning,
    Block1Found,
    HeaderClassified,
    BlocksSliced,
    BlocksDecoded,
    Done,
    Failed,
}

fn marker(block: u8) -> String {
    format!("{{{}:", block)
}

/// Смещения маркеров `{1:`..`{5:` в теле сообщения.
#[derive(Debug, Clone)]
struct BlockMarkers {
    /// Первое вхождение каждого маркера.
    offsets: [Option<usize>; 5],
    /// Все вхождения всех маркеров по возрастанию, включая повторы.
    boundaries: Vec<usize>,
}

impl BlockMarkers {
    fn locate(body: &str) -> Self {
        let mut offsets = [None; 5];
        let mut boundaries = Vec::new();
        for (i, offset) in offsets.iter_mut().enumerate() {
            let needle = marker(i as u8 + 1);
            *offset = body.find(&needle);
            boundaries.extend(body.match_indices(&needle).map(|(at, _)| at));
        }
        boundaries.sort_unstable();
        BlockMarkers {
            offsets,
            boundaries,
        }
    }

    fn offset(&self, block: u8) -> Option<usize> {
        self.offsets[usize::from(block) - 1]
    }

    /// Сырой текст блока от его первого маркера до ближайшего следующего маркера.
    fn slice<'a>(&self, body: &'a str, block: u8) -> Option<&'a str> {
        let start = self.offset(block)?;
        let end = self
            .boundaries
            .iter()
            .copied()
            .find(|&at| at > start)
            .unwrap_or(body.len());
        Some(body[start..end].trim())
    }
}

/// Содержимое блоков без обрамления.
struct BlockSlices<'a> {
    block1: &'a str,
    block2: &'a str,
    block3: Option<&'a str>,
    block4: &'a str,
    block5: Option<&'a str>,
}

fn unwrap_block(block: u8, raw: &str) -> Result<&str, FramingError> {
    raw.strip_prefix(marker(block).as_str())
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or(FramingError::UnterminatedBlock(block))
}

fn unwrap_text_block(raw: &str) -> Result<&str, FramingError> {
    let inner = raw
        .strip_prefix(marker(4).as_str())
        .and_then(|rest| rest.strip_suffix(TERMINATOR))
        .ok_or(FramingError::UnterminatedBlock(4))?;
    Ok(inner
        .strip_prefix("\r\n")
        .or_else(|| inner.strip_prefix('\n'))
        .unwrap_or(inner))
}

/// Автомат разбора одного сообщения. Владеет списком диагностик.
struct SwiftFramer<'a> {
    text: &'a str,
    state: FramerState,
    errors: Vec<Diagnostic>,
}

impl<'a> SwiftFramer<'a> {
    fn new(text: &'a str) -> Self {
        SwiftFramer {
            text,
            state: FramerState::Scanning,
            errors: Vec::new(),
        }
    }

    fn advance(&mut self, next: FramerState) {
        debug!("SWIFT framer: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn fail(mut self, error: FramingError, fields: Vec<Field>) -> ParseResult<SwiftMessage> {
        warn!("SWIFT message was not decoded: {}", error);
        self.advance(FramerState::Failed);
        self.errors.push(Diagnostic::Fatal(error));
        ParseResult::new(None, fields, self.errors)
    }

    fn run(mut self) -> ParseResult<SwiftMessage> {
        let body = match resolve_block1(self.text) {
            Ok(body) => body,
            Err(e) => return self.fail(e, Vec::new()),
        };
        self.advance(FramerState::Block1Found);

        let markers = match self.classify(body) {
            Ok(markers) => markers,
            Err(e) => return self.fail(e, Vec::new()),
        };
        self.advance(FramerState::HeaderClassified);

        let slices = match slice_blocks(body, &markers) {
            Ok(slices) => slices,
            Err(e) => return self.fail(e, Vec::new()),
        };
        self.advance(FramerState::BlocksSliced);

        let block4 = Block4::decode(slices.block4, &mut self.errors);
        let fields = block4.fields().to_vec();
        let message = match decode_headers(&slices, block4) {
            Ok(message) => message,
            Err(e) => return self.fail(e, fields),
        };
        self.advance(FramerState::BlocksDecoded);

        debug!(
            "decoded MT{} ({}) with {} text fields",
            message.mt(),
            message.direction(),
            fields.len()
        );
        self.advance(FramerState::Done);
        ParseResult::new(Some(message), fields, self.errors)
    }

    /// Проверяет количество блоков, терминатор блока 4 и порядок блоков.
    ///
    /// Лишние блоки 2..5 только сообщаются; разбор идёт по первым маркерам.
    fn classify(&mut self, body: &str) -> Result<BlockMarkers, FramingError> {
        let mut counts = [0usize; 5];
        for (i, count) in counts.iter_mut().enumerate() {
            *count = count_matches(body, &marker(i as u8 + 1));
        }

        for block in [2u8, 4] {
            if counts[usize::from(block) - 1] == 0 {
                return Err(FramingError::MissingBlock(block));
            }
        }
        for block in 2u8..=5 {
            if counts[usize::from(block) - 1] > 1 {
                self.errors
                    .push(Diagnostic::Framing(FramingError::DuplicateBlock(block)));
            }
        }

        let markers = BlockMarkers::locate(body);
        check_terminator(body, &markers)?;

        let mut pairs = vec![(1u8, 2u8), (2, 4), (1, 4)];
        if markers.offset(3).is_some() {
            pairs.extend([(1, 3), (2, 3), (3, 4)]);
        }
        if markers.offset(5).is_some() {
            pairs.extend([(1, 5), (2, 5), (4, 5)]);
        }
        let mut ordered = true;
        for (first, second) in pairs {
            if markers.offset(first) > markers.offset(second) {
                self.errors
                    .push(Diagnostic::Framing(FramingError::OutOfOrder { first, second }));
                ordered = false;
            }
        }
        if !ordered {
            return Err(FramingError::BlocksOutOfOrder);
        }

        debug!("SWIFT block offsets: {:?}", markers.offsets);
        Ok(markers)
    }
}

/// Находит ровно один блок 1, при необходимости отрезая заголовок ACK/UAK.
fn resolve_block1(text: &str) -> Result<&str, FramingError> {
    let marker1 = marker(1);
    match count_matches(text, &marker1) {
        0 => Err(FramingError::MissingBlock1),
        1 => Ok(text),
        _ if ACK_PREFIXES.iter().any(|prefix| text.starts_with(prefix)) => {
            let start = text
                .find(MESSAGE_BLOCK1)
                .ok_or(FramingError::DuplicateBlock1)?;
            let body = &text[start..];
            if count_matches(body, &marker1) != 1 {
                return Err(FramingError::DuplicateBlock1AfterAck);
            }
            debug!("stripped {} bytes of ACK/UAK header", start);
            Ok(body)
        }
        _ => Err(FramingError::DuplicateBlock1),
    }
}

/// Терминатор `-}` должен стоять после `{4:` и до следующей `{`.
fn check_terminator(body: &str, markers: &BlockMarkers) -> Result<(), FramingError> {
    if !body.contains(TERMINATOR) {
        return Err(FramingError::MissingTerminator);
    }
    let Some(block4) = markers.offset(4) else {
        return Err(FramingError::MissingBlock(4));
    };
    let after = &body[block4 + 1..];
    match (after.find(TERMINATOR), after.find('{')) {
        (None, _) => Err(FramingError::MisplacedTerminator),
        (Some(dash), Some(brace)) if brace < dash => Err(FramingError::MisplacedTerminator),
        _ => Ok(()),
    }
}

fn slice_blocks<'a>(body: &'a str, markers: &BlockMarkers) -> Result<BlockSlices<'a>, FramingError> {
    let raw = |block: u8| markers.slice(body, block).ok_or(FramingError::MissingBlock(block));
    Ok(BlockSlices {
        block1: unwrap_block(1, raw(1)?)?,
        block2: unwrap_block(2, raw(2)?)?,
        block3: markers
            .slice(body, 3)
            .map(|raw| unwrap_block(3, raw))
            .transpose()?,
        block4: unwrap_text_block(raw(4)?)?,
        block5: markers
            .slice(body, 5)
            .map(|raw| unwrap_block(5, raw))
            .transpose()?,
    })
}

fn decode_headers(slices: &BlockSlices<'_>, block4: Block4) -> Result<SwiftMessage, FramingError> {
    Ok(SwiftMessage {
        block1: Block1::decode(slices.block1)?,
        block2: Block2::decode(slices.block2)?,
        block3: slices.block3.map(|contents| TagBlock::decode(3, contents)),
        block4,
        block5: slices.block5.map(|contents| TagBlock::decode(5, contents)),
    })
}

/// Декодированное SWIFT-сообщение.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwiftMessage {
    block1: Block1,
    block2: Block2,
    block3: Option<TagBlock>,
    block4: Block4,
    block5: Option<TagBlock>,
}

impl SwiftMessage {
    pub fn block1(&self) -> &Block1 {
        &self.block1
    }

    pub fn block2(&self) -> &Block2 {
        &self.block2
    }

    pub fn block3(&self) -> Option<&TagBlock> {
        self.block3.as_ref()
    }

    pub fn block4(&self) -> &Block4 {
        &self.block4
    }

    pub fn block5(&self) -> Option<&TagBlock> {
        self.block5.as_ref()
    }

    /// Тип сообщения, три цифры.
    pub fn mt(&self) -> &str {
        self.block2.mt()
    }

    pub fn direction(&self) -> Direction {
        self.block2.direction()
    }

    /// Отправитель: для входящего сообщения это блок 1, для исходящего блок 2.
    pub fn sender(&self) -> &dyn BankIdentifier {
        match self.direction() {
            Direction::Input => &self.block1,
            Direction::Output => &self.block2,
        }
    }

    pub fn receiver(&self) -> &dyn BankIdentifier {
        match self.direction() {
            Direction::Input => &self.block2,
            Direction::Output => &self.block1,
        }
    }

    /// Значение первого поля блока 4 с данным тегом.
    pub fn field(&self, tag: &str) -> Option<&str> {
        self.block4.field(tag)
    }
}

impl fmt::Display for SwiftMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.block1.formatted_block())?;
        f.write_str(&self.block2.formatted_block())?;
        if let Some(block3) = &self.block3 {
            f.write_str(&block3.formatted_block())?;
        }
        f.write_str(&self.block4.formatted_block())?;
        if let Some(block5) = &self.block5 {
            f.write_str(&block5.formatted_block())?;
        }
        Ok(())
    }
}

pub(crate) struct SwiftParser;

impl MessageParser for SwiftParser {
    type Message = SwiftMessage;

    fn parse_text(text: &str) -> ParseResult<SwiftMessage> {
        SwiftFramer::new(text).run()
    }
}

/// Разбирает SWIFT MT сообщение.
///
/// Поля результата - это поля блока 4. Если сообщение не удалось собрать
/// из-за дефекта заголовков, поля блока 4 всё равно возвращаются.
///
/// # Пример
///
/// ```rust
/// use interbank_parser::parse_from_swift;
/// use interbank_parser::swift_blocks::Direction;
///
/// let text = "{1:F01ABCDUS10AXXX0000000000}{2:I202MNOPUS40HXYZX}{4:\r\n:20:REF1\r\n-}";
/// let result = parse_from_swift(text);
/// let message = result.message().expect("сообщение не разобрано");
/// assert_eq!(message.direction(), Direction::Input);
/// assert_eq!(message.field("20"), Some("REF1"));
/// assert_eq!(message.to_string(), text);
/// ```
pub fn parse_from_swift(text: &str) -> ParseResult<SwiftMessage> {
    SwiftParser::parse_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MT202: &str = "{1:F01ABCDUS10AXXX0000000000}{2:I202MNOPUS40HXYZX}{4:\r\n\
                         :20:101101012345678A\r\n\
                         :32A:101101USD10100,50\r\n\
                         -}{5:{MAC:41720873}{CHK:123456789ABC}}";

    fn fatal_of(text: &str) -> FramingError {
        let result = parse_from_swift(text);
        assert!(!result.has_message());
        match result.fatal() {
            Some(Diagnostic::Fatal(e)) => e.clone(),
            other => panic!("expected a fatal error, got {:?}", other),
        }
    }

    #[test]
    fn test_decodes_and_round_trips() {
        let result = parse_from_swift(MT202);
        assert!(result.errors().is_empty(), "{:?}", result.error_messages());
        let message = result.message().unwrap();
        assert_eq!(message.mt(), "202");
        assert_eq!(message.block5().unwrap().field("MAC"), Some("41720873"));
        assert_eq!(result.field_count(), 2);
        assert_eq!(message.to_string(), MT202);
    }

    #[test]
    fn test_sender_follows_direction() {
        let message = parse_from_swift(MT202).into_message().unwrap();
        assert_eq!(message.sender().bic12(), "ABCDUS10AXXX");
        assert_eq!(message.receiver().bic12(), "MNOPUS40HXYZ");
        assert_eq!(message.receiver().branch(), "XYZ");
    }

    #[test]
    fn test_missing_block1() {
        assert_eq!(fatal_of("{2:I202MNOPUS40HXYZX}{4:\r\n:20:X\r\n-}"), FramingError::MissingBlock1);
    }

    #[test]
    fn test_two_block1_without_ack_header() {
        let text = format!("{{1:F01ABCDUS10AXXX0000000000}}{}", MT202);
        assert_eq!(fatal_of(&text), FramingError::DuplicateBlock1);
    }

    #[test]
    fn test_ack_header_is_stripped() {
        let text = format!("{{1:F21ABCDUS10AXXX0000000000}}{{4:{{177:1011011200}}{{451:0}}}}{}", MT202);
        let result = parse_from_swift(&text);
        assert!(result.errors().is_empty(), "{:?}", result.error_messages());
        assert_eq!(result.message().unwrap().to_string(), MT202);
    }

    #[test]
    fn test_missing_block2_and_block4() {
        assert_eq!(
            fatal_of("{1:F01ABCDUS10AXXX0000000000}{4:\r\n:20:X\r\n-}"),
            FramingError::MissingBlock(2)
        );
        assert_eq!(
            fatal_of("{1:F01ABCDUS10AXXX0000000000}{2:I202MNOPUS40HXYZX}"),
            FramingError::MissingBlock(4)
        );
    }

    #[test]
    fn test_terminator_checks() {
        assert_eq!(
            fatal_of("{1:F01ABCDUS10AXXX0000000000}{2:I202MNOPUS40HXYZX}{4:\r\n:20:X\r\n}"),
            FramingError::MissingTerminator
        );
        assert_eq!(
            fatal_of("{1:F01ABCDUS10AXXX0000000000}{2:I202MNOPUS40HXYZX}{4:\r\n:20:X\r\n}{5:{CHK:-}}"),
            FramingError::MisplacedTerminator
        );
    }

    #[test]
    fn test_out_of_order_blocks_are_reported_then_fatal() {
        let text = "{2:I202MNOPUS40HXYZX}{1:F01ABCDUS10AXXX0000000000}{4:\r\n:20:X\r\n-}";
        let result = parse_from_swift(text);
        assert!(!result.has_message());
        assert_eq!(
            result.errors(),
            &[
                Diagnostic::Framing(FramingError::OutOfOrder { first: 1, second: 2 }),
                Diagnostic::Fatal(FramingError::BlocksOutOfOrder),
            ]
        );
    }

    #[test]
    fn test_duplicate_block3_is_not_fatal() {
        let text = "{1:F01ABCDUS10AXXX0000000000}{2:I202MNOPUS40HXYZX}{3:{108:A}}{3:{108:B}}{4:\r\n:20:X\r\n-}";
        let result = parse_from_swift(text);
        assert!(result.has_message());
        assert_eq!(
            result.errors(),
            &[Diagnostic::Framing(FramingError::DuplicateBlock(3))]
        );
        assert_eq!(result.message().unwrap().block3().unwrap().field("108"), Some("A"));
    }

    #[test]
    fn test_invalid_direction_keeps_text_fields() {
        let text = "{1:F01ABCDUS10AXXX0000000000}{2:X202MNOPUS40HXYZX}{4:\r\n:20:X\r\n:21:Y\r\n-}";
        let result = parse_from_swift(text);
        assert!(!result.has_message());
        assert_eq!(result.field_count(), 2);
        assert_eq!(result.error_count(), 1);
        assert_eq!(
            result.error_messages(),
            vec!["SWIFT message has an invalid block 2: Neither I nor O.".to_string()]
        );
    }

    #[test]
    fn test_unterminated_header_block() {
        let text = "{1:F01ABCDUS10AXXX0000000000{2:I202MNOPUS40HXYZX}{4:\r\n:20:X\r\n-}";
        assert_eq!(fatal_of(text), FramingError::UnterminatedBlock(1));
    }

    #[test]
    fn test_untagged_text_line_stays_in_message() {
        let text = "{1:F01ABCDUS10AXXX0000000000}{2:I202MNOPUS40HXYZX}{4:\r\n\
                    :20:REF\r\n\
                    :BADTAG\r\n\
                    MORE TEXT\r\n\
                    :21:X\r\n\
                    -}";
        let result = parse_from_swift(text);
        let message = result.message().unwrap();
        assert_eq!(message.field("20"), Some("REF\r\n:BADTAG\r\nMORE TEXT"));
        assert_eq!(message.field("21"), Some("X"));
        assert_eq!(message.to_string(), text);

        // строки считаются от начала блока 4
        assert_eq!(
            result.errors(),
            &[
                Diagnostic::Token {
                    line: 2,
                    defect: crate::error::TokenDefect::MissingClose(':'),
                },
                Diagnostic::MalformedLine { line: 2 },
            ]
        );
    }
}
