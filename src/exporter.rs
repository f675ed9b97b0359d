use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;
use crate::resolver::{IdLookup, IdResolver};
use crate::schema::FriendsPageSchema;
use crate::transliterate::transliterate;

#[derive(Debug, Clone)]
pub struct Contact {
    pub link: String,
    pub id: String,
    pub name: String,
}

/// Walks the document one fragment at a time. Fragments without a profile
/// link are skipped; any extraction or resolution failure aborts the run
/// before the export file is touched.
pub fn load_contacts<L: IdLookup>(
    document: &str,
    schema: &FriendsPageSchema,
    resolver: &mut IdResolver<L>,
) -> Result<Vec<Contact>, ExportError> {
    let mut contacts = Vec::new();

    for fragment in schema.segment(document) {
        let Some(link) = schema.extract_link(fragment) else {
            continue;
        };

        let id = resolver.resolve(link)?;
        let name = transliterate(schema.extract_name(fragment)?);

        contacts.push(Contact {
            link: link.to_string(),
            id,
            name,
        });
    }

    Ok(contacts)
}

/// Overwrites the destination with one `id;name` line per contact, in
/// document order.
pub fn export<P: AsRef<Path>>(contacts: &[Contact], path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    let write_err = |e: std::io::Error| ExportError::ExportWrite {
        path: path.display().to_string(),
        source: e,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    for contact in contacts {
        writeln!(writer, "{};{}", contact.id, contact.name).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;
    Ok(())
}
