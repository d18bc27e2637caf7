/// Integration tests for adfs

use adfs::format::{ADFS_800K_SIZE, ADFS_L_SIZE, ADFS_S_SIZE};
use adfs::*;
use proptest::prelude::*;

const SECTOR: usize = 1024;

/// Write a 26 byte catalogue entry
fn put_entry(data: &mut [u8], at: usize, name: &str, load: u32, length: u32, address: u32, atts: u8) {
    data[at..at + 10].fill(0x0D);
    data[at..at + name.len()].copy_from_slice(name.as_bytes());
    data[at + 10..at + 14].copy_from_slice(&load.to_le_bytes());
    data[at + 14..at + 18].fill(0);
    data[at + 18..at + 22].copy_from_slice(&length.to_le_bytes());
    data[at + 22..at + 25].copy_from_slice(&address.to_le_bytes()[..3]);
    data[at + 25] = atts;
}

fn put_field(data: &mut [u8], from: usize, to: usize, text: &str) {
    data[from..to].fill(0x0D);
    data[from..from + text.len()].copy_from_slice(text.as_bytes());
}

/// Write the head and tail of a 1280 byte S/M/L directory
fn put_old_dir(data: &mut [u8], head: usize, name: &str, parent: usize, title: &str) {
    let end = head + 0x500;
    data[head] = 1;
    data[head + 1..head + 5].copy_from_slice(b"Hugo");
    put_field(data, end - 52, end - 42, name);
    data[end - 42..end - 39].copy_from_slice(&((parent / 256) as u32).to_le_bytes()[..3]);
    put_field(data, end - 39, end - 20, title);
    data[end - 6] = 1;
    data[end - 5..end - 1].copy_from_slice(b"Hugo");
}

/// Write the head and tail of a 2048 byte D/E/F directory
fn put_new_dir(data: &mut [u8], head: usize, marker: &[u8; 4], name: &str, parent: usize, title: &str) {
    let end = head + 2 * SECTOR;
    data[head] = 9;
    data[head + 1..head + 5].copy_from_slice(marker);
    data[end - 38..end - 35].copy_from_slice(&((parent / 256) as u32).to_le_bytes()[..3]);
    put_field(data, end - 35, end - 16, title);
    put_field(data, end - 16, end - 6, name);
    data[end - 6] = 9;
    data[end - 5..end - 1].copy_from_slice(marker);
}

/// A 160K S format image holding one file, HELLO
fn hello_image() -> Vec<u8> {
    let mut data = vec![0u8; ADFS_S_SIZE];
    put_old_dir(&mut data, 0x200, "$", 0x200, "Hello disc");
    put_entry(&mut data, 0x205, "HELLO", 0xFFF0_E000, 4, 0x07, 0);
    data[0x700..0x704].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
    data
}

/// An 800K E format image
///
/// Map layout (sectors):
/// - 0-3: object 2, map and root directory
/// - 4-5: object 1, defects
/// - 6-7: object 3, $.Readme
/// - 8-9: object 4, $.Sub
/// - 10-11 and 14-15: object 5, $.Sub.Frag
/// - 12-13: object 6, unused
fn e_image() -> Vec<u8> {
    let mut data = vec![0u8; ADFS_800K_SIZE];

    // Disc record
    data[4] = 10; // 1024 byte sectors
    data[5] = 5;
    data[6] = 2;
    data[7] = 2; // double density
    data[17..20].copy_from_slice(&[0x02, 0x00, 0x00]);
    data[20..24].copy_from_slice(&(ADFS_800K_SIZE as u32).to_le_bytes());
    data[26..33].copy_from_slice(b"Archive");

    data[0x40..0x50].copy_from_slice(&[
        0x02, 0x00, 0x00, 0x80, // object 2
        0x01, 0x80, // defects
        0x03, 0x80, // object 3
        0x04, 0x80, // object 4
        0x05, 0x80, // object 5
        0x06, 0x80, // object 6
        0x05, 0x80, // object 5 again
    ]);

    put_new_dir(&mut data, 0x800, b"Nick", "$", 0x800, "Archive");
    put_entry(&mut data, 0x805, "Readme", 0xFFFF_FF33, 5, 0x301, 0x03);
    put_entry(&mut data, 0x81F, "Sub", 0, 0x800, 0x401, 0x08);
    data[0x1800..0x1805].copy_from_slice(b"Hello");

    put_new_dir(&mut data, 0x2000, b"Nick", "Sub", 0x800, "Sub");
    put_entry(&mut data, 0x2005, "Frag", 0x0000_8000, 0x900, 0x501, 0x03);
    data[0x2800..0x3000].fill(b'x');
    data[0x3800..0x3900].fill(b'y');

    data
}

/// An 800K D format image with a root directory and one subdirectory
fn d_image() -> Vec<u8> {
    let mut data = vec![0u8; ADFS_800K_SIZE];
    put_new_dir(&mut data, 0x400, b"Hugo", "$", 0x400, "Old disc");
    put_entry(&mut data, 0x405, "Docs", 0, 0x800, 0x10, 0x08);
    put_entry(&mut data, 0x41F, "Boot", 0x1900, 3, 0x30, 0x03);
    data[0x3000..0x3003].copy_from_slice(b"RUN");

    put_new_dir(&mut data, 0x1000, b"Hugo", "Docs", 0x400, "Docs");
    put_entry(&mut data, 0x1005, "Note", 0, 2, 0x31, 0x03);
    data[0x3100..0x3102].copy_from_slice(b"ok");
    data
}

#[test]
fn test_s_image_end_to_end() {
    let disc = Disc::from_bytes(hello_image()).expect("Failed to decode image");

    assert_eq!(disc.format(), DiscFormat::AdfsS);
    assert_eq!(disc.geometry(), DiscGeometry::adfs_s());
    assert_eq!(disc.disc_name(), "Hello disc");
    assert!(disc.log().is_empty(), "{}", disc.log());

    let root = disc.root();
    assert_eq!(root.name, "$");
    assert_eq!(root.len(), 1);

    let hello = root.children[0].as_file().expect("HELLO should be a file");
    assert_eq!(hello.name, "HELLO");
    assert_eq!(hello.filetype().as_deref(), Some("0e0"));
    assert_eq!(hello.length, 4);
    assert_eq!(hello.data, vec![0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn test_sequence_mismatch_warns_once() {
    let mut data = hello_image();
    data[0x6FA] = 0x42;

    let disc = Disc::from_bytes(data).expect("Failed to decode image");
    assert_eq!(disc.root().len(), 1);
    assert_eq!(disc.log().len(), 1);
    assert_eq!(disc.log().entries()[0].severity, Severity::Warning);
    assert_eq!(
        disc.log().entries()[0].message,
        "Broken directory: Hello disc at [200, 600]"
    );
}

#[test]
fn test_e_image_end_to_end() {
    let disc = Disc::from_bytes(e_image()).expect("Failed to decode image");

    assert_eq!(disc.format(), DiscFormat::AdfsE);
    assert_eq!(disc.format_name(), "ADFS E format");
    assert_eq!(disc.disc_name(), "Archive");
    assert!(disc.log().is_clean(), "{}", disc.log());

    let record = disc.record().expect("E format discs have a disc record");
    assert_eq!(record.sector_size(), 1024);
    assert_eq!(record.density, Density::Double);

    let messages: Vec<&str> = disc.log().iter().map(|e| e.message.as_str()).collect();
    assert!(messages.contains(&"E format disc"));
    assert!(messages.contains(&"1 mapped defect found."));

    let readme = disc.find("$.Readme").and_then(Node::as_file).expect("Readme");
    assert_eq!(readme.data, b"Hello");
    assert_eq!(readme.filetype().as_deref(), Some("fff"));
    assert!(readme.time_stamp().is_some());

    let frag = disc.find("Sub.Frag").and_then(Node::as_file).expect("Frag");
    assert_eq!(frag.data.len(), 0x900);
    assert!(frag.data[..0x800].iter().all(|&b| b == b'x'));
    assert!(frag.data[0x800..].iter().all(|&b| b == b'y'));
    assert!(frag.filetype().is_none());

    let map = disc.map().expect("E format discs have a map");
    assert_eq!(
        map.extents(5),
        [
            Extent::new(10 * SECTOR, 12 * SECTOR),
            Extent::new(14 * SECTOR, 16 * SECTOR)
        ]
    );
}

#[test]
fn test_e_image_unresolved_object() {
    let mut data = e_image();
    put_entry(&mut data, 0x839, "Ghost", 0, 10, 0x7000, 0x03);

    let disc = Disc::from_bytes(data).expect("Failed to decode image");
    assert!(disc.find("Ghost").is_none());
    assert_eq!(disc.root().len(), 2);
    assert_eq!(disc.log().count(Severity::Warning), 1);
    assert!(!disc.log().is_clean());
}

#[test]
fn test_e_image_listing() {
    let disc = Disc::from_bytes(e_image()).expect("Failed to decode image");
    let text = disc.listing().to_string();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("$.Readme"));
    assert_eq!(
        lines[1],
        "$.Sub.Frag      8000            0               900"
    );
}

#[test]
fn test_d_image() {
    let disc = Disc::from_bytes(d_image()).expect("Failed to decode image");

    assert_eq!(disc.format(), DiscFormat::AdfsD);
    assert_eq!(disc.disc_name(), "Old disc");
    assert!(disc.log().is_clean(), "{}", disc.log());
    assert!(disc.map().is_none());

    let boot = disc.find("Boot").and_then(Node::as_file).expect("Boot");
    assert_eq!(boot.data, b"RUN");
    let note = disc.find("$.Docs.Note").and_then(Node::as_file).expect("Note");
    assert_eq!(note.data, b"ok");

    let paths: Vec<String> = disc.root().walk().into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, ["$.Docs", "$.Docs.Note", "$.Boot"]);
}

#[test]
fn test_d_image_directory_loop() {
    let mut data = d_image();
    // Point Docs back at the root
    put_entry(&mut data, 0x405, "Docs", 0, 0x800, 0x04, 0x08);

    let disc = Disc::from_bytes(data).expect("Failed to decode image");
    let docs = disc.find("Docs").and_then(Node::as_directory).expect("Docs");
    assert!(docs.is_empty());
    assert_eq!(disc.log().count(Severity::Warning), 1);
}

#[test]
fn test_unrecognized_length() {
    let err = Disc::from_bytes(vec![0u8; 200_000]).unwrap_err();
    assert!(matches!(err, AdfsError::UnrecognizedFormat { length: 200_000 }));
    assert_eq!(
        err.to_string(),
        "Unrecognized format: no ADFS geometry is 200000 bytes long"
    );
}

#[test]
fn test_unidentified_800k_strict_and_relaxed() {
    let blank = vec![0u8; ADFS_800K_SIZE];
    assert!(matches!(
        Disc::from_bytes(blank.clone()),
        Err(AdfsError::UnidentifiedFormat { .. })
    ));

    let options = DecodeOptions::new().with_strict_identification(false);
    let disc = Disc::from_bytes_with(blank, options).expect("Relaxed decode");
    assert_eq!(disc.format(), DiscFormat::AdfsD);
    assert_eq!(disc.log().count(Severity::Error), 1);
    assert_eq!(disc.disc_name(), "Untitled");
}

#[test]
fn test_l_image_deinterleave() {
    let track_size = DiscGeometry::adfs_l().track_size();

    // Build the image in logical order, then interleave the sides
    let mut logical = vec![0u8; ADFS_L_SIZE];
    put_old_dir(&mut logical, 0x200, "$", 0x200, "Big disc");
    put_entry(&mut logical, 0x205, "Far", 0x1900, 4, 0x500, 0);
    logical[80 * track_size..80 * track_size + 4].copy_from_slice(b"side");

    let mut stored = Vec::with_capacity(ADFS_L_SIZE);
    for track in 0..80 {
        stored.extend_from_slice(&logical[track * track_size..(track + 1) * track_size]);
        stored.extend_from_slice(&logical[(track + 80) * track_size..(track + 81) * track_size]);
    }

    let disc = Disc::from_bytes(stored.clone()).expect("Failed to decode image");
    assert_eq!(disc.format(), DiscFormat::AdfsL);
    let far = disc.find("Far").and_then(Node::as_file).expect("Far");
    assert_eq!(far.data, b"side");
    assert_eq!(disc.sectors(), logical.as_slice());

    // Already sequenced images must not be rearranged again
    let options = DecodeOptions::new().with_deinterleave(false);
    let disc = Disc::from_bytes_with(logical, options).expect("Failed to decode image");
    let far = disc.find("Far").and_then(Node::as_file).expect("Far");
    assert_eq!(far.data, b"side");
}

#[test]
fn test_open_file() {
    let path = std::env::temp_dir().join(format!("adfs-test-{}.adf", std::process::id()));
    std::fs::write(&path, hello_image()).expect("Failed to write image");

    assert!(io::is_adfs_file(&path));
    let disc = Disc::open(&path).expect("Failed to open image");
    assert_eq!(disc.root().len(), 1);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_log_display() {
    let disc = Disc::from_bytes(hello_image()).expect("Failed to decode image");
    assert_eq!(disc.log().to_string(), "All objects located.\n");

    let mut data = hello_image();
    data[0x6FA] = 0x42;
    let disc = Disc::from_bytes(data).expect("Failed to decode image");
    assert_eq!(
        disc.log().to_string(),
        "Warning: Broken directory: Hello disc at [200, 600]\n"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_corrupt_map_never_panics(map in proptest::collection::vec(any::<u8>(), 0x3C0)) {
        let mut data = e_image();
        data[0x40..0x400].copy_from_slice(&map);
        let disc = Disc::from_bytes(data);
        prop_assert!(disc.is_ok());
    }

    #[test]
    fn prop_corrupt_root_never_panics(root in proptest::collection::vec(any::<u8>(), 0x500)) {
        let mut data = hello_image();
        data[0x200..0x700].copy_from_slice(&root);
        prop_assert!(Disc::from_bytes(data).is_ok());
    }
}
