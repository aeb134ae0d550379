use proptest::prelude::*;
use records::*;

fn passenger(name: &str, seat_number: u32) -> PassengerRecord {
    PassengerRecord {
        name: pack_text(name).unwrap(),
        age: 30,
        gender: b'F',
        phone: pack_text("9990000000").unwrap(),
        flight_number: pack_text("AI101").unwrap(),
        seat_number,
    }
}

#[test]
fn passenger_dump_keeps_record_order() {
    let records = vec![passenger("Asha", 5), passenger("Ravi", 1), passenger("Meera", 42)];
    let bytes = encode_dump(&records).unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE + 3 * PassengerRecord::SIZE);

    let decoded: Vec<PassengerRecord> = decode_dump(&bytes).unwrap();
    let names: Vec<String> = decoded
        .iter()
        .map(|p| unpack_text(&p.name).unwrap())
        .collect();
    assert_eq!(names, ["Asha", "Ravi", "Meera"]);
    assert_eq!(decoded[2].seat_number, 42);
}

#[test]
fn header_count_larger_than_body_is_truncation() {
    let mut bytes = encode_dump(&[passenger("Asha", 5)]).unwrap();
    bytes[0] = 2;
    assert!(matches!(
        decode_dump::<PassengerRecord>(&bytes),
        Err(Error::Truncated { .. })
    ));
}

proptest! {
    #[test]
    fn decoding_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_dump::<FlightRecord>(&bytes);
        let _ = decode_dump::<PassengerRecord>(&bytes);
    }

    #[test]
    fn bounded_text_survives_packing(text in "[A-Za-z0-9 ]{0,50}") {
        let field: [u8; NAME_LEN] = pack_text(&text).unwrap();
        prop_assert_eq!(unpack_text(&field).unwrap(), text);
    }
}
