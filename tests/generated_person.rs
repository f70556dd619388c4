//! Exercises the checked-in `Person` artifact the way downstream code would:
//! encode into a buffer sized by `size()`, decode from raw bytes, and check
//! the bounded-storage behavior at every edge.
include!("gen/person.schema.rs");

type TestPerson = Person<16, 4>;

fn encode_to_vec(person: &TestPerson) -> Vec<u8> {
    let mut buf = vec![0u8; person.size()];
    let mut w = Writer::new(&mut buf);
    person.encode(&mut w);
    assert_eq!(w.pos(), buf.len(), "size() must match encoded length");
    buf
}

fn decode_from(bytes: &[u8]) -> TestPerson {
    let mut person = TestPerson::default();
    person.decode(&mut Reader::new(bytes));
    person
}

fn sample() -> TestPerson {
    let mut person = TestPerson::default();
    person.id = 42;
    person.name.push_str("Al");
    person.tags.push(1);
    person.tags.push(2);
    person
}

#[test]
fn golden_person_bytes() {
    let person = sample();
    assert_eq!(person.size(), 10);
    assert_eq!(
        encode_to_vec(&person),
        [0x08, 0x2a, 0x12, 0x02, 0x41, 0x6c, 0x1a, 0x02, 0x01, 0x02]
    );
}

#[test]
fn round_trips_within_capacities() {
    let person = sample();
    assert_eq!(decode_from(&encode_to_vec(&person)), person);
}

#[test]
fn negative_id_round_trips_through_truncation() {
    let mut person = TestPerson::default();
    person.id = -1;
    // 32-bit truncation: five varint bytes, not ten.
    assert_eq!(person.size(), 6);
    assert_eq!(decode_from(&encode_to_vec(&person)).id, -1);
}

#[test]
fn default_message_encodes_to_nothing() {
    let person = TestPerson::default();
    assert_eq!(person.size(), 0);
    assert_eq!(encode_to_vec(&person), Vec::<u8>::new());
    assert_eq!(decode_from(&[]), person);
}

#[test]
fn decode_truncates_to_the_first_capacity_elements() {
    // Six packed tags against a capacity of four.
    let person = decode_from(&[0x1a, 0x06, 1, 2, 3, 4, 5, 6]);
    assert_eq!(person.tags.as_slice(), &[1, 2, 3, 4]);

    // Twenty name bytes against a capacity of sixteen.
    let mut bytes = vec![0x12, 20];
    bytes.extend(std::iter::repeat(b'x').take(20));
    let person = decode_from(&bytes);
    assert_eq!(person.name.as_str(), "x".repeat(16));
}

#[test]
fn len_boundary_is_respected_after_unknown_content() {
    // Unknown LEN field (tag 9) whose payload is junk; the cursor must land
    // exactly past it so the following field still decodes.
    let person = decode_from(&[0x4a, 0x03, 0xff, 0xff, 0xff, 0x08, 0x07]);
    assert_eq!(person.id, 7);
}

#[test]
fn overlong_len_declaration_is_clamped() {
    // Declared length 16, two bytes present: the decoder takes what exists
    // and terminates without faulting.
    let person = decode_from(&[0x12, 0x10, b'h', b'i']);
    assert_eq!(person.name.as_str(), "hi");
}

#[test]
fn unknown_fields_change_nothing_else() {
    let bytes = [
        0x3d, 1, 2, 3, 4, // tag 7, fixed32
        0x31, 1, 2, 3, 4, 5, 6, 7, 8, // tag 6, fixed64
        0x48, 0x96, 0x01, // tag 9, varint 150
        0x08, 0x2a, // id = 42
    ];
    let person = decode_from(&bytes);
    assert_eq!(person.id, 42);
    assert!(person.tags.is_empty());
}

#[test]
fn unsupported_wire_type_terminates_the_message() {
    // Wire type 3 (group) is treated as end of message; fields before it
    // survive, fields after it are never reached.
    let person = decode_from(&[0x08, 0x2a, 0x0b, 0x12, 0x01, b'Z']);
    assert_eq!(person.id, 42);
    assert!(person.name.is_empty());
}

#[test]
fn encode_into_an_undersized_buffer_drops_the_tail() {
    let person = sample();
    let mut buf = [0u8; 4];
    let mut w = Writer::new(&mut buf);
    person.encode(&mut w);
    assert_eq!(w.pos(), 4);
    assert_eq!(buf, [0x08, 0x2a, 0x12, 0x02]);
}
