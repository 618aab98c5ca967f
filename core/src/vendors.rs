use std::sync::OnceLock;

use arpscout_common::vendors::VendorRepository;
use mac_oui::Oui;
use pnet::util::MacAddr;
use tracing::warn;

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(e) => {
                warn!("Vendor lookups disabled, OUI database failed to load: {e}");
                None
            }
        })
        .as_ref()
}

/// Vendor names from the bundled IEEE OUI database.
pub struct MacOuiRepo;

impl VendorRepository for MacOuiRepo {
    fn get_vendor(&self, mac: MacAddr) -> Option<String> {
        let db = get_oui_db()?;
        match db.lookup_by_mac(&mac.to_string()) {
            Ok(Some(entry)) => Some(entry.company_name.clone()),
            _ => None,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
