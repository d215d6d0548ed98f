use crate::{
    pdf::{
        trailer::TRAILER,
        xref::{FreeObject, UsedObject, XrefEntry},
        Dictionary, Document, Trailer, Xref,
    },
    simple_encode::SimpleEncoder,
    writer::{Encoder, Writer},
};

pub(crate) const XREF: &[u8] = b"xref";
pub(crate) const STARTXREF: &[u8] = b"startxref";
pub(crate) const EOF_MARKER: &[u8] = b"%%EOF";
pub(crate) const OBJ: &[u8] = b"obj";
pub(crate) const ENDOBJ: &[u8] = b"endobj";

/// Comment with bytes above 127 so transfer tools treat the file as binary.
const BINARY_MARKER: &[u8] = b"%\xE2\xE3\xCF\xD3\n";

impl Encoder<Document> for SimpleEncoder {
    /// Offsets in the xref table are relative to the writer's position, so the
    /// writer should be empty when the document starts.
    fn write_to(doc: &Document, writer: &mut dyn Writer) {
        log::trace!("write document with {} objects", doc.len());

        writer.write(b"%PDF-");
        writer.write(format!("{}.{}", doc.version.0, doc.version.1).as_bytes());
        writer.write(b"\n");
        writer.write(BINARY_MARKER);

        let mut xref_entries = Vec::<XrefEntry>::with_capacity(doc.len() + 1);
        xref_entries.push(FreeObject::head().into());

        for (id, obj) in doc.objects() {
            xref_entries.push(
                UsedObject {
                    number: id.get() as usize,
                    byte_offset: writer.position(),
                    generation: 0,
                }
                .into(),
            );
            writer.write(id.get().to_string().as_bytes());
            writer.write(b" 0 ");
            writer.write(OBJ);
            writer.write(b"\n");
            Self::write_to(obj, writer);
            writer.write(b"\n");
            writer.write(ENDOBJ);
            writer.write(b"\n");
        }

        let start_xref = writer.position();
        let xref = Xref::from(xref_entries);
        Self::write_to(&xref, writer);

        let trailer = Trailer {
            size: xref.len(),
            root: doc.root().into(),
            info: doc.info().map(Into::into),
        };
        Self::write_to(&trailer, writer);

        writer.write(STARTXREF);
        writer.write(b"\n");
        writer.write(start_xref.to_string().as_bytes());
        writer.write(b"\n");
        writer.write(EOF_MARKER);
        writer.write(b"\n");
    }
}

fn xref_record(offset: usize, generation: usize, kind: u8) -> String {
    format!("{:010} {:05} {} \n", offset, generation, char::from(kind))
}

impl Encoder<Xref> for SimpleEncoder {
    fn write_to(o: &Xref, writer: &mut dyn Writer) {
        log::trace!("write XRef");

        writer.write(XREF);
        writer.write(b"\n");
        // a single subsection starting at object 0
        writer.write(format!("0 {}\n", o.len()).as_bytes());
        for entry in o.entries() {
            let record = match entry {
                XrefEntry::Free(free) => xref_record(free.next_free, free.generation, b'f'),
                XrefEntry::Used(used) => xref_record(used.byte_offset, used.generation, b'n'),
            };
            writer.write(record.as_bytes());
        }
    }
}

impl Encoder<Trailer> for SimpleEncoder {
    fn write_to(trailer: &Trailer, writer: &mut dyn Writer) {
        log::trace!("write Trailer");

        let trailer_dict = Dictionary::from(trailer);
        writer.write(TRAILER);
        writer.write(b"\n");
        Self::write_to(&trailer_dict, writer);
        writer.write(b"\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{xref::XREF_RECORD_LEN, Name, Object};

    #[test]
    fn xref_records_are_fixed_width() {
        assert_eq!(xref_record(0, 65535, b'f'), "0000000000 65535 f \n");
        assert_eq!(xref_record(15, 0, b'n'), "0000000015 00000 n \n");
        assert_eq!(xref_record(1234567, 0, b'n').len(), XREF_RECORD_LEN);
    }

    #[test]
    fn minimal_document_layout() {
        let mut doc = Document::new();
        let catalog = doc.add_object(Dictionary::new().with("Type", Name::from("Catalog")));
        doc.set_root(catalog).unwrap();
        let out = doc.serialize();

        let header = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n";
        let object = b"1 0 obj\n<< /Type /Catalog >>\nendobj\n";
        let mut expected = Vec::new();
        expected.extend_from_slice(header);
        expected.extend_from_slice(object);
        let xref_offset = expected.len();
        expected.extend_from_slice(b"xref\n0 2\n0000000000 65535 f \n");
        expected.extend_from_slice(format!("{:010} 00000 n \n", header.len()).as_bytes());
        expected.extend_from_slice(b"trailer\n<< /Size 2 /Root 1 0 R >>\n");
        expected.extend_from_slice(format!("startxref\n{}\n%%EOF\n", xref_offset).as_bytes());

        assert_eq!(
            out,
            expected,
            "got:\n{}",
            String::from_utf8_lossy(&out)
        );
    }

    #[test]
    fn offsets_include_framing_of_previous_objects() {
        let mut doc = Document::new();
        let first = doc.add_object(Object::Null);
        doc.add_object(Object::Integer(42));
        doc.set_info(first).unwrap();
        let out = doc.serialize();

        let second_at = out.windows(7).position(|w| w == b"2 0 obj").unwrap();
        let first_at = out.windows(7).position(|w| w == b"1 0 obj").unwrap();
        assert_eq!(second_at - first_at, b"1 0 obj\nnull\nendobj\n".len());

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains(&format!("{:010} 00000 n \n{:010} 00000 n \n", first_at, second_at)));
        assert!(text.contains("<< /Size 3 /Root 1 0 R /Info 1 0 R >>"));
    }
}
