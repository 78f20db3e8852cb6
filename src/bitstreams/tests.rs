use quickcheck_macros::quickcheck;

use super::*;

fn bits(s: &str) -> BitString {
    s.parse().unwrap()
}

#[test]
fn test_bitstring_text_form() {
    let b = bits("0110100");
    assert_eq!(b.len(), 7);
    assert_eq!(b.to_string(), "0110100");
    assert_eq!(format!("{:?}", b), "BitString(0110100)");
    assert_eq!(b.get(1), Some(true));
    assert_eq!(b.get(7), None);
}

#[test]
fn test_bitstring_rejects_non_bits() {
    assert!(matches!("01a1".parse::<BitString>(), Err(CodecError::InvalidBit('a'))));
    assert!("".parse::<BitString>().unwrap().is_empty());
}

#[test]
fn test_append_reversed() {
    let mut stream = BitString::new();
    stream.append_reversed(&bits("1110"));
    stream.append_reversed(&bits("0"));
    stream.append(&bits("10"));
    assert_eq!(stream.to_string(), "0111010");
    assert_eq!(bits("1100").reversed(), bits("0011"));
    assert_eq!(bits("1110").leading_ones(), 3);
}

#[test]
fn test_pack_pads_partial_byte() {
    let packed = pack(&bits("1010"));
    assert_eq!(packed, vec![0b1010_0000]);
}

#[test]
fn test_pack_aligned_adds_no_padding() {
    let packed = pack(&bits("1111000010101010"));
    assert_eq!(packed, vec![0b1111_0000, 0b1010_1010]);
    assert_eq!(padding_len(16), 0);
}

#[test]
fn test_pack_empty() {
    assert!(pack(&BitString::new()).is_empty());
}

#[test]
fn test_writer_tracks_padding() {
    let mut writer = BinaryWriterBuilder::new();
    assert_eq!(writer.padding(), 0);
    writer.push_bits(&bits("110"));
    assert_eq!(writer.padding(), 5);
    assert_eq!(writer.written_bits, 3);
    writer.push_bits(&bits("00001"));
    assert_eq!(writer.padding(), 0);
    assert_eq!(&*writer.build(), &[0b1100_0001]);
}

#[test]
fn test_unpack_recovers_prefix() {
    let original = bits("10011101011");
    let packed = pack(&original);
    assert_eq!(packed.len(), 2);
    assert_eq!(unpack(&packed, original.len()).unwrap(), original);
    // The padding is readable, but it is not part of the message.
    assert_eq!(unpack(&packed, 16).unwrap().to_string(), "1001110101100000");
}

#[test]
fn test_unpack_truncated() {
    let err = unpack(&[0xFF], 9).unwrap_err();
    assert!(matches!(err, CodecError::Truncated { bits: 9, available: 8 }));
}

#[test]
fn test_reader_reads_msb_first() {
    let data = [0b1000_0001u8];
    let mut reader = BinaryReader::new(&data);
    assert_eq!(reader.read_bit(), Some(true));
    assert_eq!(reader.available(), 7);
    assert_eq!(reader.read_bits(7).unwrap(), bits("0000001"));
    assert_eq!(reader.read_bit(), None);
}

#[quickcheck]
fn pack_size_is_ceil_of_bit_len(raw: Vec<bool>) -> bool {
    let original = BitString::from(raw);
    let packed = pack(&original);
    packed.len() == (original.len() + 7) / 8
        && unpack(&packed, original.len()).map(|b| b == original).unwrap_or(false)
}
