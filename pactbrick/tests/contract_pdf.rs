use chrono::{TimeZone, Utc};
use pactbrick::{
    build_contract, build_contract_pdf,
    contract::{payload::Client, LayoutReport, Offer, Price, FONT_NAME, IMAGE_NAME, LOGO_GAP},
    pdf::{Dictionary, Name, Object},
    read_structure, ContractConfig, ContractPayload, Structure,
};

/// SOI, APP0, a baseline frame header, a few scan bytes and EOI.
fn jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    data.extend_from_slice(b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
    data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02, 0x12, 0x34, 0x56]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

fn config() -> ContractConfig {
    ContractConfig::default().with_clock(Utc.with_ymd_and_hms(2025, 2, 3, 10, 20, 30).unwrap())
}

fn payload() -> ContractPayload {
    ContractPayload {
        contract_id: Some("CTR-2025-042".to_owned()),
        client: Client {
            last_name: Some("Dupont".to_owned()),
            first_name: Some("Élise".to_owned()),
            address: Some("12 rue des Lilas, 75011 Paris".to_owned()),
            email: Some("elise@example.com".to_owned()),
        },
        offer: Offer {
            name: Some("Verte Fixe 24 mois".to_owned()),
            unit_price: Some(Price::Text("0.1854".to_owned())),
            currency: Some("EUR".to_owned()),
            details: Some("Prix fixe (hors taxes) — 100 % renouvelable".to_owned()),
            ..Offer::default()
        },
        conditions: Some("Résiliation sans frais.\nPaiement mensuel (prélèvement).".to_owned()),
        logo: None,
    }
}

fn single_page(structure: &Structure) -> Dictionary {
    let mut pages = structure.pages().unwrap();
    assert_eq!(pages.len(), 1);
    pages.remove(0)
}

fn resources(page: &Dictionary) -> Dictionary {
    page.get(b"Resources").and_then(Object::dictionary).cloned().unwrap()
}

fn content_of(structure: &Structure, page: &Dictionary) -> Vec<u8> {
    let contents = structure.resolve(page.get(b"Contents").unwrap()).unwrap();
    contents.stream().unwrap().decoded_data().unwrap()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn xref_offsets_point_at_object_headers() {
    let bytes = build_contract_pdf(&payload(), Some(&jpeg(200, 100)), &config()).unwrap();
    let structure = read_structure(&bytes).unwrap();
    structure.verify().unwrap();

    assert_eq!(structure.object_numbers(), (1..=7).collect::<Vec<u32>>());
    for number in structure.object_numbers() {
        let offset = structure.offset_of(number).unwrap();
        let header = format!("{} 0 obj", number);
        assert!(bytes[offset..].starts_with(header.as_bytes()), "object {} not at {}", number, offset);
    }

    let xref_at = structure.startxref;
    assert!(bytes[xref_at..].starts_with(b"xref\n0 8\n0000000000 65535 f \n"));
    assert!(bytes.starts_with(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n"));
    assert!(bytes.ends_with(format!("startxref\n{}\n%%EOF\n", xref_at).as_bytes()));
}

#[test]
fn page_without_logo() {
    let bytes = build_contract_pdf(&payload(), None, &config()).unwrap();
    let structure = read_structure(&bytes).unwrap();
    structure.verify().unwrap();
    assert_eq!(structure.trailer.size, 7);

    let catalog = structure.catalog().unwrap();
    assert_eq!(catalog.get(b"Type"), Some(&Object::Name(Name::from("Catalog"))));

    let page = single_page(&structure);
    let media_box: Vec<i64> = page
        .get(b"MediaBox")
        .and_then(Object::array)
        .unwrap()
        .iter()
        .filter_map(Object::integer)
        .collect();
    assert_eq!(media_box, vec![0, 0, 595, 842]);

    let resources = resources(&page);
    assert!(resources.get(b"XObject").is_none());
    let font_ref = resources
        .get(b"Font")
        .and_then(Object::dictionary)
        .and_then(|fonts| fonts.get(FONT_NAME.as_bytes()))
        .unwrap();
    let font = structure.resolve(font_ref).unwrap();
    let font = font.dictionary().unwrap();
    assert_eq!(font.get(b"BaseFont"), Some(&Object::Name(Name::from("Helvetica"))));
    assert_eq!(font.get(b"Encoding"), Some(&Object::Name(Name::from("WinAnsiEncoding"))));

    let content = content_of(&structure, &page);
    assert!(!contains(&content, b"Do\n"));
    assert!(contains(&content, b"40 812.00 Td\n(Contrat d'\xC9nergie - CTR-2025-042) Tj\n"));
}

#[test]
fn page_with_logo() {
    let logo = jpeg(220, 110);
    let built = build_contract(&payload(), Some(&logo), &config()).unwrap();
    let structure = read_structure(&built.bytes).unwrap();
    structure.verify().unwrap();

    let page = single_page(&structure);
    let image_ref = resources(&page)
        .get(b"XObject")
        .and_then(Object::dictionary)
        .and_then(|x| x.get(IMAGE_NAME.as_bytes()).cloned())
        .unwrap();
    let image = structure.resolve(&image_ref).unwrap();
    let image = image.stream().unwrap();
    assert_eq!(image.dictionary.get(b"Subtype"), Some(&Object::Name(Name::from("Image"))));
    assert_eq!(image.dictionary.get(b"Width"), Some(&Object::Integer(220)));
    assert_eq!(image.dictionary.get(b"Height"), Some(&Object::Integer(110)));
    assert_eq!(image.dictionary.get(b"Filter"), Some(&Object::Name(Name::from("DCTDecode"))));
    assert_eq!(&image.data[..], &logo[..]);

    let placement = built.layout.image.unwrap();
    assert_eq!(placement.width, 110.0);
    assert_eq!(placement.height, 55.0);
    assert_eq!(built.layout.title_y, placement.y - LOGO_GAP);

    let content = content_of(&structure, &page);
    assert!(contains(&content, b"q\n110.00 0.00 0.00 55.00 40.00 757.00 cm\n/Im1 Do\nQ\n"));
}

#[test]
fn unreadable_logo_is_left_out() {
    let built = build_contract(&payload(), Some(b"GIF89a"), &config()).unwrap();
    assert_eq!(built.layout.image, None);

    let structure = read_structure(&built.bytes).unwrap();
    assert_eq!(structure.object_numbers().len(), 6);
    assert!(resources(&single_page(&structure)).get(b"XObject").is_none());
}

#[test]
fn frozen_clock_gives_identical_bytes() {
    let first = build_contract_pdf(&payload(), Some(&jpeg(64, 64)), &config()).unwrap();
    let second = build_contract_pdf(&payload(), Some(&jpeg(64, 64)), &config()).unwrap();
    assert_eq!(first, second);

    let later = config().with_clock(Utc.with_ymd_and_hms(2025, 2, 3, 10, 20, 31).unwrap());
    let third = build_contract_pdf(&payload(), Some(&jpeg(64, 64)), &later).unwrap();
    assert_ne!(first, third);
}

#[test]
fn info_dictionary() {
    let bytes = build_contract_pdf(&payload(), None, &config()).unwrap();
    let structure = read_structure(&bytes).unwrap();
    let info = structure.info().unwrap().unwrap();
    assert_eq!(
        info.get(b"CreationDate").and_then(Object::string).map(|s| s.to_vec()),
        Some(b"D:20250203102030Z".to_vec())
    );
    assert_eq!(
        info.get(b"Author").and_then(Object::string).map(|s| s.to_vec()),
        Some(b"EcoIA".to_vec())
    );
}

#[test]
fn text_is_escaped_and_normalized() {
    let bytes = build_contract_pdf(&payload(), None, &config()).unwrap();
    let structure = read_structure(&bytes).unwrap();
    let content = content_of(&structure, &single_page(&structure));

    assert!(contains(&content, b"(D\xE9tails : Prix fixe \\(hors taxes\\) - 100 % renouvelable) Tj\n"));
    assert!(contains(&content, b"(R\xE9siliation sans frais.) Tj\nT*\n(Paiement mensuel \\(pr\xE9l\xE8vement\\).) Tj\n"));
    assert!(contains(&content, b"(Pr\xE9nom : \xC9lise) Tj\n"));
    assert!(contains(&content, b"(G\xE9n\xE9r\xE9 le 2025-02-03 10:20:30 UTC - EcoIA) Tj\n"));
}

#[test]
fn compressed_content_reads_back() {
    let plain = build_contract(&payload(), None, &config()).unwrap();
    let packed = build_contract(&payload(), None, &config().with_compression(true)).unwrap();
    assert_eq!(plain.layout, packed.layout);

    let structure = read_structure(&packed.bytes).unwrap();
    structure.verify().unwrap();
    let page = single_page(&structure);
    let contents = structure.resolve(page.get(b"Contents").unwrap()).unwrap();
    let stream = contents.stream().unwrap();
    assert_eq!(stream.dictionary.get(b"Filter"), Some(&Object::Name(Name::from("FlateDecode"))));

    let plain_structure = read_structure(&plain.bytes).unwrap();
    let plain_content = content_of(&plain_structure, &single_page(&plain_structure));
    assert_eq!(stream.decoded_data().unwrap(), plain_content);
}

#[test]
fn empty_payload_still_builds() {
    let built = build_contract(&ContractPayload::default(), None, &config()).unwrap();
    let structure = read_structure(&built.bytes).unwrap();
    structure.verify().unwrap();

    let LayoutReport { sections, .. } = built.layout;
    let headings: Vec<&str> = sections.iter().map(|(h, _)| h.as_str()).collect();
    assert_eq!(headings, vec!["Informations Client", "Offre choisie"]);
}

#[test]
fn signature_floor_with_long_conditions() {
    let mut long = payload();
    long.conditions = Some("Article. ".repeat(1500));
    let built = build_contract(&long, None, &config()).unwrap();
    assert_eq!(built.layout.signature_y, 120.0);
    read_structure(&built.bytes).unwrap().verify().unwrap();
}
