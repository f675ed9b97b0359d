use fb_contacts_lib::{exporter, logger};
use fb_contacts_lib::{FriendsPageSchema, IdCache, IdResolver, LookupClient};

use std::error::Error;
use std::fs;
use log::info;

const CONTACTS_HTML: &str = "fb_contacts.html";
const ID_CACHE: &str = "facebook_id_cache.csv";
const ID_EXPORT: &str = "fb_cosy_contacts.csv";

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();

    // The cache file must pre-exist; an empty file is a valid empty cache.
    let cache = IdCache::load(ID_CACHE)?;

    let document = fs::read_to_string(CONTACTS_HTML).map_err(|e| {
        fb_contacts_lib::ExportError::DocumentRead {
            path: CONTACTS_HTML.to_string(),
            source: e,
        }
    })?;

    let schema = FriendsPageSchema::facebook();
    let mut resolver = IdResolver::new(cache, LookupClient::new());

    let contacts = exporter::load_contacts(&document, &schema, &mut resolver)?;
    info!("{} records loaded.", contacts.len());

    exporter::export(&contacts, ID_EXPORT)?;
    info!("File '{}' is ready.", ID_EXPORT);

    Ok(())
}
