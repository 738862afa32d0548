//! Разбор реальных образцов сообщений всех трёх форматов.

use interbank_parser::{
    FedWireIdentifier, parse_from_chips, parse_from_fedwire, parse_from_swift,
    swift_blocks::{BankIdentifier, Direction},
};

const MT202: &str = include_str!("fixtures/mt202.txt");
const MT191: &str = include_str!("fixtures/mt191.txt");
const CHIPS: &str = include_str!("fixtures/chips.txt");
const FEDWIRE: &str = include_str!("fixtures/fedwire.txt");

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const MT541: &str = "{1:F01ABCDUS20AXXX0000000000}{2:I541MNOPHK50XABCN}{3:{108:101101C9010F99}}{4:\r\n\
:16R:GENL\r\n\
:20C::SEME//101101C9010F99\r\n\
:23G:NEWM\r\n\
:16S:GENL\r\n\
:16R:TRADDET\r\n\
:98A::SETT//20101101\r\n\
:98A::TRAD//20101101\r\n\
:90A::DEAL//PRCT/96,571\r\n\
:35B:ISIN US100001AB10\r\n\
BLAH1 PROPERTY GROUP INC\r\n\
:16S:TRADDET\r\n\
:16R:FIAC\r\n\
:36B::SETT//FAMT/12345,\r\n\
:97A::SAFE//FUN03\r\n\
:16S:FIAC\r\n\
:16R:SETDET\r\n\
:22F::SETR//TRAD\r\n\
:16R:SETPRTY\r\n\
:95P::PSET//ABCDGBAA\r\n\
:16S:SETPRTY\r\n\
:16R:SETPRTY\r\n\
:95R::SELL/ECLR/11996\r\n\
:16S:SETPRTY\r\n\
:16R:SETPRTY\r\n\
:95R::DEAG/ECLR/11996\r\n\
:16S:SETPRTY\r\n\
:16R:AMT\r\n\
:19A::SETT//USD12345,98\r\n\
:16S:AMT\r\n\
:16S:SETDET\r\n\
-}";

#[test]
fn test_swift_mt202() {
    init();
    let result = parse_from_swift(MT202);
    assert!(result.errors().is_empty(), "{:?}", result.error_messages());
    let message = result.message().unwrap();

    assert_eq!(message.block1().bic12(), "ABCDUS10AXXX");
    assert_eq!(message.block1().bic11(), "ABCDUS10XXX");
    assert_eq!(message.block1().bic8(), "ABCDUS10");

    let block2 = message.block2().inbound().unwrap();
    assert!(message.block2().outbound().is_none());
    assert_eq!(message.mt(), "202");
    assert_eq!(message.direction(), Direction::Input);
    assert_eq!(block2.bic12(), "MNOPUS40HXYZ");
    assert_eq!(block2.bic11(), "MNOPUS40XYZ");
    assert_eq!(block2.bic8(), "MNOPUS40");

    assert_eq!(message.block4().fields().len(), 6);
    assert_eq!(message.field("20"), Some("101101012345678A"));
    assert_eq!(message.field("21"), Some("A10112090QQ1-150"));
    assert_eq!(message.field("58A"), Some("QRSTJP90MNO"));
    assert_eq!(message.to_string(), MT202);
}

#[test]
fn test_swift_mt541() {
    init();
    let result = parse_from_swift(MT541);
    assert!(result.errors().is_empty(), "{:?}", result.error_messages());
    let message = result.message().unwrap();

    assert_eq!(message.block1().bic12(), "ABCDUS20AXXX");
    assert_eq!(message.mt(), "541");
    assert_eq!(message.block2().bic12(), "MNOPHK50XABC");
    assert_eq!(message.block2().bic11(), "MNOPHK50ABC");
    assert_eq!(message.block3().unwrap().field("108"), Some("101101C9010F99"));

    assert_eq!(result.field_count(), 29);
    assert_eq!(message.field("20C"), Some(":SEME//101101C9010F99"));
    assert_eq!(message.field("23G"), Some("NEWM"));
    assert_eq!(
        message.field("35B"),
        Some("ISIN US100001AB10\r\nBLAH1 PROPERTY GROUP INC")
    );

    let sequences = message.block4().fields_with_tag("16R");
    assert_eq!(sequences.len(), 8);
    assert_eq!(sequences[0], "GENL");
    assert_eq!(sequences[1], "TRADDET");
    assert_eq!(sequences[5], "SETPRTY");
    assert_eq!(sequences[7], "AMT");

    assert_eq!(message.to_string(), MT541);
}

#[test]
fn test_swift_mt191_outbound() {
    init();
    let result = parse_from_swift(MT191);
    assert!(result.errors().is_empty(), "{:?}", result.error_messages());
    let message = result.message().unwrap();

    assert_eq!(message.block1().bic12(), "MNOPUS10AXXX");
    let block2 = message.block2().outbound().unwrap();
    assert!(message.block2().inbound().is_none());
    assert_eq!(message.mt(), "191");
    assert_eq!(message.direction(), Direction::Output);
    assert_eq!(block2.bic12(), "WXYZHK10AXXX");
    assert_eq!(block2.bic11(), "WXYZHK10XXX");
    assert_eq!(block2.sequence, "000123");
    assert_eq!(block2.output_date, "101130");
    assert_eq!(block2.input_time, "0953");
    assert_eq!(block2.session, "3603");

    // исходящее сообщение: отправитель в блоке 2, получатель в блоке 1
    assert_eq!(message.sender().bic8(), "WXYZHK10");
    assert_eq!(message.receiver().bic8(), "MNOPUS10");

    assert_eq!(message.block4().fields().len(), 5);
    assert_eq!(message.field("32B"), Some("USD45,"));
    assert_eq!(message.to_string(), MT191);
}

#[test]
fn test_swift_ack_header_is_ignored() {
    init();
    let with_ack = format!(
        "{{1:F21ABCDUS10AXXX0000000000}}{{4:{{177:1011011200}}{{451:0}}}}{}",
        MT191
    );
    let plain = parse_from_swift(MT191);
    let acked = parse_from_swift(&with_ack);
    assert!(acked.errors().is_empty(), "{:?}", acked.error_messages());
    assert_eq!(acked.message(), plain.message());
    assert_eq!(acked.fields(), plain.fields());
}

#[test]
fn test_swift_uak_header_is_ignored() {
    let with_uak = format!("{{1:F31ABCDUS10AXXX0000000000}}{}", MT202);
    let result = parse_from_swift(&with_uak);
    assert!(result.has_message());
    assert_eq!(result.message().unwrap().to_string(), MT202);
}

#[test]
fn test_chips_sample() {
    let result = parse_from_chips(CHIPS);
    assert_eq!(result.error_count(), 0, "{:?}", result.error_messages());
    assert_eq!(result.field_count(), 10);

    let first = &result.fields()[0];
    assert_eq!(first.tag(), "031");
    assert_eq!(
        first.value(),
        "01 19920508 0509 1 03 125956\r\nSSN: 0045348, ISN: 001673, OSN: 003406"
    );
    assert_eq!(result.fields()[1].value(), "0008 B");
    assert_eq!(result.fields()[9].tag(), "507");

    let message = result.message().unwrap();
    assert!(message.field_exists("031"));
    assert!(message.field_exists("507"));
    assert!(!message.field_exists("199"));
    assert_eq!(message.field_value("999"), "");
    assert_eq!(message.field_value("500"), "C 005419");
    assert_eq!(message.amount(), "000220769618");
    assert_eq!(message.psn(), "001663");
    assert_eq!(message.send_participant_reference(), "74300T743013042");
    assert_eq!(message.related_bank_reference(), "FX DEAL");
    assert_eq!(message.beneficiary_bank(), "D 10990765 CITIBANK, LONDON, ENGLAND");
    assert_eq!(message.beneficiary(), "B UBSWCHZH80A");
    assert_eq!(message.beneficiary_bank_id(), "D 10990765");
    assert_eq!(message.beneficiary_id(), "B UBSWCHZH80A");
    assert_eq!(message.originator_id(), "C 005419");
    assert_eq!(
        interbank_parser::ChipsMessage::lookup_id_code(&message.beneficiary_bank_id()[..1]),
        Some("Demand Deposit Account (DDA)")
    );
    assert_eq!(message.to_string(), CHIPS);
}

#[test]
fn test_fedwire_sample() {
    let result = parse_from_fedwire(FEDWIRE);
    assert_eq!(result.error_count(), 0, "{:?}", result.error_messages());
    assert_eq!(result.field_count(), 15);
    assert_eq!(result.fields()[0].to_string(), "{1100}02T 3");
    assert_eq!(result.fields()[10].value(), "CTR");

    let message = result.message().unwrap();
    assert_eq!(message.message_disposition(), "02T 3");
    assert_eq!(message.acceptance_timestamp(), "11221518FT01");
    assert_eq!(message.omad(), "");
    assert_eq!(message.error_field(), "W172BEYOND CUTOFF");
    assert_eq!(message.sender_supplied_information(), "0222000212T");
    assert_eq!(message.type_code(), "10");
    assert_eq!(message.subtype_code(), "00");
    assert_eq!(message.type_and_subtype_code(), "1000");
    assert_eq!(message.imad(), "20101122I1B78A1R000002");
    assert_eq!(message.amount(), "000000000100");
    assert_eq!(message.sender_aba(), "999999999");
    assert_eq!(message.receiver_aba(), "888888888");
    assert_eq!(message.business_function_code(), "CTR");
    assert_eq!(message.originator_id(), "D000000123456789");
    assert_eq!(
        message.originator(),
        "D000000123456789\r\nFANCYTOWN ENERGY COMPANY L.P.\r\n200 S RAINER ST STE 1901\r\nLOS ANGELES          CA 90071-0192"
    );

    let identifier = FedWireIdentifier::parse(message.originator_id()).unwrap();
    assert_eq!(identifier.code(), "D");
    assert_eq!(identifier.identifier(), "000000123456789");
    assert_eq!(
        identifier.code_description(),
        Some("Demand Deposit Account (DDA) Number")
    );
    assert_eq!(message.to_string(), FEDWIRE);
}

#[test]
fn test_lf_only_input_matches_crlf() {
    let lf = FEDWIRE.replace("\r\n", "\n");
    let crlf = parse_from_fedwire(FEDWIRE);
    let lf = parse_from_fedwire(&lf);
    assert_eq!(lf.fields(), crlf.fields());
    assert_eq!(lf.error_count(), 0);
}

#[test]
fn test_chips_three_mandatory_fields() {
    let text = "[260] 000220769618\r\n[270] 001663\r\n[320] 74300T743013042\r\n";
    let result = parse_from_chips(text);
    assert_eq!(result.error_count(), 0);
    assert_eq!(result.field_count(), 3);
    let message = result.message().unwrap();
    assert_eq!(message.amount(), "000220769618");
    assert_eq!(message.psn(), "001663");
    assert_eq!(message.to_string(), text);
}

#[test]
fn test_chips_duplicate_and_missing_fields() {
    let result = parse_from_chips("[260] 000220769618\r\n[260] 000000000001\r\n[320] 74300T743013042");
    assert_eq!(result.field_count(), 3);
    assert_eq!(
        result.error_messages(),
        vec![
            "Duplicate field: 260 exists more than once.".to_string(),
            "Missing mandatory field: Field 270.".to_string(),
        ]
    );
    let message = result.message().unwrap();
    assert_eq!(message.amount(), "000220769618");
    assert_eq!(message.psn(), "");
    assert_eq!(message.to_string(), "[260] 000220769618\r\n[260] 000000000001\r\n[320] 74300T743013042");
}

#[test]
fn test_fedwire_bad_type_subtype_length() {
    let text = FEDWIRE.replace("{1510}1000", "{1510}100");
    let result = parse_from_fedwire(&text);
    assert!(result.has_message());
    let length_errors: Vec<String> = result
        .error_messages()
        .into_iter()
        .filter(|message| message.contains("1510") && message.contains("incorrect length"))
        .collect();
    assert_eq!(length_errors.len(), 1);
    assert_eq!(result.message().unwrap().type_code(), "");
}
