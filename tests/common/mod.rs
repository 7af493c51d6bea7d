#![allow(dead_code)]

use acrofill::{PdfService, PdfServiceBuilder};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::io::Cursor;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn service() -> PdfService {
    init_logging();
    match PdfServiceBuilder::new().build() {
        Ok(service) => service,
        Err(e) => panic!("default service failed to build: {e}"),
    }
}

/// Builds AcroForm documents in memory. Pages are US Letter unless sized
/// otherwise; fields are placed on the page given when they are added.
pub struct FormFixture {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<ObjectId>,
    annots: Vec<Vec<Object>>,
    fields: Vec<Object>,
    with_form: bool,
}

impl FormFixture {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: Vec::new(),
            annots: Vec::new(),
            fields: Vec::new(),
            with_form: true,
        }
    }

    /// A document with no AcroForm dictionary at all.
    pub fn without_form(mut self) -> Self {
        self.with_form = false;
        self
    }

    pub fn page(mut self, width: i64, height: i64) -> Self {
        let id = self.doc.new_object_id();
        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content_id = self.doc.add_object(Stream::new(
            dictionary! {},
            b"BT /F1 10 Tf 36 36 Td (existing) Tj ET".to_vec(),
        ));
        self.doc.objects.insert(
            id,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            }),
        );
        self.pages.push(id);
        self.annots.push(Vec::new());
        self
    }

    fn page_id(&self, page: usize) -> ObjectId {
        match self.pages.get(page - 1) {
            Some(id) => *id,
            None => panic!("fixture page {page} must be added before its fields"),
        }
    }

    fn add_widget_field(&mut self, page: usize, mut dict: lopdf::Dictionary) -> ObjectId {
        let page_id = self.page_id(page);
        dict.set("Subtype", "Widget");
        dict.set("P", page_id);
        dict.set("Rect", vec![100.into(), 600.into(), 300.into(), 620.into()]);
        let id = self.doc.add_object(dict);
        self.annots[page - 1].push(id.into());
        self.fields.push(id.into());
        id
    }

    pub fn text(mut self, name: &str, value: Option<&str>, flags: i64) -> Self {
        let mut dict = dictionary! {
            "T" => Object::string_literal(name),
            "FT" => "Tx",
            "Ff" => flags,
        };
        if let Some(value) = value {
            dict.set("V", Object::string_literal(value));
        }
        self.add_widget_field(1, dict);
        self
    }

    pub fn text_on(mut self, page: usize, name: &str) -> Self {
        let dict = dictionary! { "T" => Object::string_literal(name), "FT" => "Tx" };
        self.add_widget_field(page, dict);
        self
    }

    /// Options are `(export, label)` pairs.
    pub fn choice(mut self, name: &str, options: &[(&str, &str)], flags: i64) -> Self {
        let opt: Vec<Object> = options
            .iter()
            .map(|(export, label)| {
                Object::Array(vec![Object::string_literal(*export), Object::string_literal(*label)])
            })
            .collect();
        let dict = dictionary! {
            "T" => Object::string_literal(name),
            "FT" => "Ch",
            "Ff" => flags,
            "Opt" => opt,
        };
        self.add_widget_field(1, dict);
        self
    }

    fn states(&mut self, on: &str) -> Object {
        let on_id = self.doc.add_object(Stream::new(dictionary! {}, vec![]));
        let off_id = self.doc.add_object(Stream::new(dictionary! {}, vec![]));
        Object::Dictionary(dictionary! { "N" => dictionary! { on => on_id, "Off" => off_id } })
    }

    pub fn checkbox(mut self, name: &str, on: &str) -> Self {
        let ap = self.states(on);
        let dict = dictionary! {
            "T" => Object::string_literal(name),
            "FT" => "Btn",
            "V" => "Off",
            "AS" => "Off",
            "AP" => ap,
        };
        self.add_widget_field(1, dict);
        self
    }

    pub fn radio(mut self, name: &str, states: &[&str]) -> Self {
        let page_id = self.page_id(1);
        let group_id = self.doc.new_object_id();
        let mut kids = Vec::new();
        for state in states {
            let ap = self.states(state);
            let kid = self.doc.add_object(dictionary! {
                "Parent" => group_id,
                "Subtype" => "Widget",
                "AS" => "Off",
                "AP" => ap,
                "P" => page_id,
                "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
            });
            self.annots[0].push(kid.into());
            kids.push(Object::Reference(kid));
        }
        self.doc.objects.insert(
            group_id,
            Object::Dictionary(dictionary! {
                "T" => Object::string_literal(name),
                "FT" => "Btn",
                "Ff" => (1 << 15),
                "Kids" => kids,
            }),
        );
        self.fields.push(group_id.into());
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        if self.pages.is_empty() {
            self = self.page(612, 792);
        }
        for (page, annots) in self.pages.iter().zip(&self.annots) {
            if !annots.is_empty()
                && let Ok(dict) = self.doc.get_object_mut(*page).and_then(Object::as_dict_mut)
            {
                dict.set("Annots", annots.clone());
            }
        }
        let kids: Vec<Object> = self.pages.iter().map(|id| (*id).into()).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.pages.len() as i64,
            }),
        );
        let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        if self.with_form {
            let form_id = self.doc.add_object(dictionary! { "Fields" => self.fields.clone() });
            catalog.set("AcroForm", form_id);
        }
        let catalog_id = self.doc.add_object(catalog);
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        if let Err(e) = self.doc.save_to(&mut bytes) {
            panic!("fixture failed to serialise: {e}");
        }
        bytes
    }
}

/// A form exercising every field kind on a single Letter page.
pub fn sample_form() -> Vec<u8> {
    FormFixture::new()
        .page(612, 792)
        .text("Name", None, 0)
        .text("Locked", Some("fixed"), 1)
        .choice("Country", &[("no", "Norway"), ("se", "Sweden")], 1 << 17)
        .choice("City", &[("osl", "Oslo"), ("ber", "Bergen")], (1 << 17) | (1 << 18))
        .choice("Colors", &[("r", "Red"), ("g", "Green"), ("b", "Blue")], 1 << 21)
        .checkbox("Agree", "Yes")
        .radio("Size", &["S", "M", "L"])
        .build()
}

/// Decoded operations of every content stream on `page` (1-based).
pub fn page_operators(pdf: &[u8], page: u32) -> Vec<lopdf::content::Operation> {
    let doc = match Document::load_mem(pdf) {
        Ok(doc) => doc,
        Err(e) => panic!("output is not a readable PDF: {e}"),
    };
    let Some(page_id) = doc.get_pages().get(&page).copied() else {
        panic!("page {page} missing");
    };
    match doc.get_and_decode_page_content(page_id) {
        Ok(content) => content.operations,
        Err(e) => panic!("page {page} content unreadable: {e}"),
    }
}

/// Strings shown with `Tj` on `page`, lossily decoded.
pub fn shown_text(pdf: &[u8], page: u32) -> Vec<String> {
    page_operators(pdf, page)
        .into_iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
        .collect()
}

pub fn count_operator(pdf: &[u8], page: u32, operator: &str) -> usize {
    page_operators(pdf, page)
        .iter()
        .filter(|op| op.operator == operator)
        .count()
}

pub fn png_base64(width: u32, height: u32, translucent: bool) -> String {
    let mut bytes = Vec::new();
    let result = if translucent {
        RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 128]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
    } else {
        RgbImage::from_pixel(width, height, Rgb([30, 200, 30]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
    };
    if let Err(e) = result {
        panic!("png encoding failed: {e}");
    }
    STANDARD.encode(bytes)
}

pub fn jpeg_base64(width: u32, height: u32) -> String {
    let mut bytes = Vec::new();
    if let Err(e) = RgbImage::from_pixel(width, height, Rgb([10, 20, 200]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
    {
        panic!("jpeg encoding failed: {e}");
    }
    STANDARD.encode(bytes)
}
