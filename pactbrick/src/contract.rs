//! One-page contract layout.
//!
//! [`compose`] writes the page content stream top to bottom while tracking a
//! vertical cursor; [`build_contract`] wraps it into a complete file.

use chrono::{DateTime, Utc};

pub use payload::{Client, ContractPayload, LogoRef, Offer, Price};

use crate::{
    config::ContractConfig,
    content::Content,
    error::PbError,
    jpeg::{self, JpegHeader},
    pdf::{
        document::{dict_types, jpeg_image, Catalog, Page, PageTree, Resources, Type1Font, K_TYPE},
        Dictionary, Document, Name, PdfString, Stream,
    },
    text,
    wrap::LineWrapper,
};

pub mod payload;

/// A4 portrait, in points.
pub const MEDIA_BOX: [i64; 4] = [0, 0, 595, 842];
const PAGE_HEIGHT: f64 = 842.0;

pub const FONT_NAME: &str = "F1";
pub const IMAGE_NAME: &str = "Im1";

const LEFT: f64 = 40.0;
const TOP_Y: f64 = 812.0;

const LOGO_TOP_MARGIN: f64 = 30.0;
/// Space between the bottom of the logo and the title baseline.
pub const LOGO_GAP: f64 = 20.0;

const TITLE_SIZE: f64 = 20.0;
const TITLE_ADVANCE: f64 = 28.0;
const HEADING_SIZE: f64 = 12.0;
const HEADING_ADVANCE: f64 = 16.0;
const BODY_SIZE: f64 = 11.0;
pub const LINE_HEIGHT: f64 = 14.0;

const SIGNATURE_GAP: f64 = 40.0;
/// Signatures never go lower than this, even when the sections run long.
pub const SIGNATURE_FLOOR: f64 = 120.0;
const SIGNATURE_LENGTH: f64 = 200.0;
const SECOND_SIGNATURE_OFFSET: f64 = 240.0;
const CAPTION_RAISE: f64 = 6.0;
const CAPTION_SIZE: f64 = 10.0;

const FOOTER_Y: f64 = 40.0;
const FOOTER_SIZE: f64 = 9.0;

const PLACEHOLDER: &str = "—";
const DEFAULT_CURRENCY: &str = "EUR";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const PRODUCER: &str = concat!("pactbrick ", env!("CARGO_PKG_VERSION"));

/// Where the logo ended up on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Positions chosen while composing, for callers and tests that need to know
/// where things landed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutReport {
    pub image: Option<ImagePlacement>,
    pub title_y: f64,
    /// Heading and number of body lines, per emitted section.
    pub sections: Vec<(String, usize)>,
    pub signature_y: f64,
    /// Cursor after the last section.
    pub cursor_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub content: Content,
    pub layout: LayoutReport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltContract {
    pub bytes: Vec<u8>,
    pub layout: LayoutReport,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutCursor {
    x: f64,
    y: f64,
}

/// Image bytes that passed the header scan.
#[derive(Debug, Clone, Copy)]
struct PreparedImage<'a> {
    header: JpegHeader,
    data: &'a [u8],
}

fn prepare_image(data: Option<&[u8]>) -> Option<PreparedImage<'_>> {
    let data = data.filter(|d| !d.is_empty())?;
    match jpeg::inspect(data) {
        Some(header) if header.width > 0 && header.height > 0 => Some(PreparedImage { header, data }),
        Some(header) => {
            log::warn!("Skipping logo with empty dimensions {:?}", header.dimensions());
            None
        }
        None => {
            log::warn!("Skipping logo: no readable JPEG frame header in {} bytes", data.len());
            None
        }
    }
}

struct Composer<'a> {
    content: Content,
    cursor: LayoutCursor,
    font: Name,
    wrapper: LineWrapper,
    config: &'a ContractConfig,
    report: LayoutReport,
}

impl<'a> Composer<'a> {
    fn new(config: &'a ContractConfig) -> Self {
        Self {
            content: Content::new(),
            cursor: LayoutCursor { x: LEFT, y: TOP_Y },
            font: Name::from(FONT_NAME),
            wrapper: LineWrapper::default(),
            config,
            report: LayoutReport::default(),
        }
    }

    /// Draw the logo in its own graphics state so the scaling does not leak
    /// into text positioning.
    fn logo(&mut self, header: &JpegHeader) {
        let width = self.config.logo_width;
        let height = f64::from(header.height) * width / f64::from(header.width);
        let x = LEFT;
        let y = PAGE_HEIGHT - LOGO_TOP_MARGIN - height;

        self.content
            .save_state()
            .transform([width, 0.0, 0.0, height, x, y])
            .x_object(&Name::from(IMAGE_NAME))
            .restore_state();

        self.cursor.y = y - LOGO_GAP;
        self.report.image = Some(ImagePlacement { x, y, width, height });
    }

    fn single_line(&mut self, size: f64, x: f64, y: f64, line: &str) {
        self.content
            .begin_text()
            .set_font(&self.font, size)
            .next_line_at(x, y)
            .show_text(line)
            .end_text();
    }

    fn title(&mut self, payload: &ContractPayload) {
        let id = payload.contract_id.as_deref().unwrap_or(PLACEHOLDER);
        let title = format!("{} — {}", self.config.labels.title, id);
        self.report.title_y = self.cursor.y;
        self.single_line(TITLE_SIZE, self.cursor.x, self.cursor.y, &title);
        self.cursor.y -= TITLE_ADVANCE;
    }

    /// Heading plus wrapped body lines. The cursor ends one blank line below
    /// the last body line.
    fn section(&mut self, heading: &str, fields: &[String]) {
        self.single_line(HEADING_SIZE, self.cursor.x, self.cursor.y, heading);
        self.cursor.y -= HEADING_ADVANCE;

        self.content
            .begin_text()
            .set_font(&self.font, BODY_SIZE)
            .next_line_at(self.cursor.x, self.cursor.y)
            .set_leading(LINE_HEIGHT);
        let mut used = 0;
        for field in fields {
            for line in self.wrapper.wrap(&text::normalize(Some(field.as_str()))) {
                self.content.show_text(&line).next_line();
                used += 1;
            }
        }
        self.content.end_text();

        self.cursor.y -= LINE_HEIGHT * (used as f64 + 1.0);
        self.report.sections.push((heading.to_owned(), used));
        log::trace!("section `{}`: {} lines, cursor at {:.2}", heading, used, self.cursor.y);
    }

    fn signatures(&mut self) {
        let config = self.config;
        let labels = &config.labels;

        let y = (self.cursor.y - SIGNATURE_GAP).max(SIGNATURE_FLOOR);
        let x = self.cursor.x;
        let second_x = x + SECOND_SIGNATURE_OFFSET;

        self.content
            .set_line_style(1.0, [0.0; 3], [0.0; 3])
            .stroke_segment((x, y), (x + SIGNATURE_LENGTH, y))
            .stroke_segment((second_x, y), (second_x + SIGNATURE_LENGTH, y));
        self.single_line(CAPTION_SIZE, x, y + CAPTION_RAISE, &labels.client_signature);
        self.single_line(CAPTION_SIZE, second_x, y + CAPTION_RAISE, &labels.supplier_signature);
        self.report.signature_y = y;
    }

    fn footer(&mut self, now: DateTime<Utc>) {
        let footer = format!(
            "{} {} — {}",
            self.config.labels.generated_on,
            now.format(TIMESTAMP_FORMAT),
            self.config.company_name
        );
        self.single_line(FOOTER_SIZE, LEFT, FOOTER_Y, &footer);
    }
}

fn client_fields(config: &ContractConfig, client: &Client) -> Vec<String> {
    let labels = &config.labels;
    let value = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        format!("{} : {}", labels.last_name, value(&client.last_name)),
        format!("{} : {}", labels.first_name, value(&client.first_name)),
        format!("{} : {}", labels.address, value(&client.address)),
        format!("{} : {}", labels.email, value(&client.email)),
    ]
}

fn offer_fields(config: &ContractConfig, offer: &Offer) -> Vec<String> {
    let labels = &config.labels;
    let price = offer
        .unit_price
        .as_ref()
        .map_or_else(|| PLACEHOLDER.to_owned(), ToString::to_string);
    let currency = offer.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    vec![
        format!("{} : {}", labels.offer_name, offer.display_name()),
        format!("{} : {} {}{}", labels.unit_price, price, currency, labels.price_unit),
        format!("{} : {}", labels.details, offer.details.as_deref().unwrap_or("")),
    ]
}

/// Write the page content stream.
///
/// `image` must be `Some` only when the page resources will contain the
/// image under [`IMAGE_NAME`].
pub fn compose(
    payload: &ContractPayload,
    image: Option<&JpegHeader>,
    config: &ContractConfig,
    now: DateTime<Utc>,
) -> Composition {
    let mut composer = Composer::new(config);

    composer.content.save_state().set_fill_rgb(0.0, 0.0, 0.0);
    if let Some(header) = image {
        composer.logo(header);
    }
    // fill color is black again after the logo
    composer.content.set_fill_rgb(0.0, 0.0, 0.0);

    composer.title(payload);

    let labels = &config.labels;
    composer.section(&labels.client_section, &client_fields(config, &payload.client));
    composer.section(&labels.offer_section, &offer_fields(config, &payload.offer));
    if let Some(conditions) = payload.conditions.as_deref().filter(|c| !c.is_empty()) {
        composer.section(&labels.conditions_section, &[conditions.to_owned()]);
    }
    composer.report.cursor_y = composer.cursor.y;

    composer.signatures();
    composer.footer(now);
    composer.content.restore_state();

    Composition {
        content: composer.content,
        layout: composer.report,
    }
}

fn info_dictionary(payload: &ContractPayload, config: &ContractConfig, now: DateTime<Utc>) -> Dictionary {
    let title = format!(
        "{} — {}",
        config.labels.title,
        payload.contract_id.as_deref().unwrap_or(PLACEHOLDER)
    );
    Dictionary::new()
        .with("Title", PdfString::from_text(&title))
        .with("Author", PdfString::from_text(&config.company_name))
        .with("Producer", PdfString::from_text(PRODUCER))
        .with(
            "CreationDate",
            PdfString::from_text(&now.format("D:%Y%m%d%H%M%SZ").to_string()),
        )
}

/// Build the complete contract file and report where the content landed.
pub fn build_contract(
    payload: &ContractPayload,
    logo: Option<&[u8]>,
    config: &ContractConfig,
) -> Result<BuiltContract, PbError> {
    let now = config.now();
    let image = prepare_image(logo);

    let mut doc = Document::new();
    // catalog and page tree point forward; both get patched at the end
    let catalog = doc.add_object(Dictionary::new().with(K_TYPE, Name::from(dict_types::CATALOG)));
    let pages = doc.add_object(Dictionary::from(&PageTree::default()));
    let font = doc.add_object(Dictionary::from(&Type1Font::helvetica()));
    let image_id = image.map(|img| doc.add_object(jpeg_image(&img.header, img.data)));

    let composition = compose(payload, image.as_ref().map(|img| &img.header), config, now);
    let content = composition.content.finish();
    let stream = if config.compress_content {
        Stream::compressed(Dictionary::new(), &content)?
    } else {
        Stream::new(Dictionary::new(), content)
    };
    let contents = doc.add_object(stream);

    let mut resources = Resources::default().with_font(FONT_NAME, font);
    if let Some(id) = image_id {
        resources = resources.with_x_object(IMAGE_NAME, id);
    }
    let page = doc.add_object(Dictionary::from(&Page {
        parent: pages,
        media_box: MEDIA_BOX,
        resources,
        contents,
    }));
    let info = doc.add_object(info_dictionary(payload, config, now));

    doc.replace_object(pages, Dictionary::from(&PageTree { kids: vec![page] }))?;
    doc.replace_object(catalog, Dictionary::from(Catalog { pages }))?;
    doc.set_root(catalog)?;
    doc.set_info(info)?;

    let bytes = doc.serialize();
    log::debug!(
        "built contract `{}`: {} objects, {} bytes, logo: {}",
        payload.contract_id.as_deref().unwrap_or(PLACEHOLDER),
        doc.len(),
        bytes.len(),
        image_id.is_some()
    );

    Ok(BuiltContract {
        bytes,
        layout: composition.layout,
    })
}

/// Build the contract file. The bytes are a complete, standalone PDF.
pub fn build_contract_pdf(
    payload: &ContractPayload,
    logo: Option<&[u8]>,
    config: &ContractConfig,
) -> Result<Vec<u8>, PbError> {
    build_contract(payload, logo, config).map(|built| built.bytes)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::jpeg::tests::tiny_jpeg;

    fn fixed_config() -> ContractConfig {
        ContractConfig::default().with_clock(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap())
    }

    fn content_str(payload: &ContractPayload, image: Option<&JpegHeader>) -> (String, LayoutReport) {
        let config = fixed_config();
        let now = config.now();
        let composition = compose(payload, image, &config, now);
        let text = composition.content.as_bytes().iter().map(|&b| char::from(b)).collect();
        (text, composition.layout)
    }

    #[test]
    fn empty_payload_renders_placeholders() {
        let (text, layout) = content_str(&ContractPayload::default(), None);
        assert!(text.starts_with("q\n0 0 0 rg\n0 0 0 rg\nBT\n/F1 20 Tf\n40 812.00 Td\n"));
        assert!(text.contains("(Contrat d'\u{C9}nergie - -) Tj\n"));
        assert!(text.contains("(Nom :) Tj\n"));
        assert!(text.contains("(Prix unitaire : - EUR/kWh) Tj\n"));
        assert!(!text.contains("Conditions"));
        assert!(!text.contains("Do\n"));
        assert!(text.ends_with("ET\nQ\n"));
        assert_eq!(layout.title_y, TOP_Y);
        assert_eq!(layout.image, None);
        assert_eq!(layout.sections.len(), 2);
    }

    #[test]
    fn cursor_reserves_a_blank_line_per_section() {
        let (_, layout) = content_str(&ContractPayload::default(), None);
        // title 28, two headings 16 each, 4 + 1 and 3 + 1 body lines
        let expected = TOP_Y - 28.0 - 16.0 - 14.0 * 5.0 - 16.0 - 14.0 * 4.0;
        assert_eq!(layout.cursor_y, expected);
        assert_eq!(layout.signature_y, expected - 40.0);
    }

    #[test]
    fn long_conditions_hit_the_signature_floor() {
        let payload = ContractPayload {
            conditions: Some("Clause. ".repeat(2000)),
            ..ContractPayload::default()
        };
        let (text, layout) = content_str(&payload, None);
        assert!(text.contains("(Conditions) Tj\n"));
        assert!(layout.cursor_y < SIGNATURE_FLOOR);
        assert_eq!(layout.signature_y, SIGNATURE_FLOOR);
        assert!(text.contains("1 w 0 0 0 RG 0 0 0 rg\n40.00 120.00 m 240.00 120.00 l S\n280.00 120.00 m 480.00 120.00 l S\n"));
    }

    #[test]
    fn logo_is_isolated_in_its_own_state() {
        let header = jpeg::inspect(&tiny_jpeg(200, 100, 3)).unwrap();
        let (text, layout) = content_str(&ContractPayload::default(), Some(&header));
        let placement = layout.image.unwrap();
        assert_eq!(placement.width, 110.0);
        assert_eq!(placement.height, 55.0);
        assert_eq!(placement.y, 842.0 - 30.0 - 55.0);
        assert!(text.starts_with("q\n0 0 0 rg\nq\n110.00 0.00 0.00 55.00 40.00 757.00 cm\n/Im1 Do\nQ\n0 0 0 rg\n"));
        assert_eq!(layout.title_y, placement.y - LOGO_GAP);
        assert!(layout.title_y < placement.y);
    }

    #[test]
    fn placement_rounds_from_double_precision() {
        // 812 - 279 * 110 / 151 = 608.7549..., which single precision rounds up
        let header = jpeg::inspect(&tiny_jpeg(151, 279, 3)).unwrap();
        let (text, layout) = content_str(&ContractPayload::default(), Some(&header));
        assert!(text.contains("110.00 0.00 0.00 203.25 40.00 608.75 cm\n"));
        assert!(text.contains("40 588.75 Td\n"));
        assert_eq!(layout.title_y, layout.image.unwrap().y - LOGO_GAP);
    }

    #[test]
    fn footer_uses_configured_clock_and_company() {
        let (text, _) = content_str(&ContractPayload::default(), None);
        assert!(text.contains("40 40.00 Td\n(G\u{E9}n\u{E9}r\u{E9} le 2025-01-02 03:04:05 UTC - EcoIA) Tj\n"));
    }

    #[test]
    fn offer_name_falls_back_to_chosen_offer() {
        let payload = ContractPayload {
            offer: Offer {
                chosen: Some("Verte".to_owned()),
                unit_price: Some(Price::Text("0.18".to_owned())),
                currency: Some("MAD".to_owned()),
                ..Offer::default()
            },
            ..ContractPayload::default()
        };
        let (text, _) = content_str(&payload, None);
        assert!(text.contains("(Nom de l'offre : Verte) Tj\n"));
        assert!(text.contains("(Prix unitaire : 0.18 MAD/kWh) Tj\n"));
    }

    #[test]
    fn unreadable_logo_is_skipped() {
        assert!(prepare_image(Some(b"not a jpeg")).is_none());
        assert!(prepare_image(Some(&[])).is_none());
        assert!(prepare_image(None).is_none());
        assert!(prepare_image(Some(&tiny_jpeg(0, 10, 3))).is_none());
        assert!(prepare_image(Some(&tiny_jpeg(10, 10, 3))).is_some());
    }
}
