use shared_kernel::string_key;

string_key!(GeoCode);
string_key!(RegionCode);

/// A municipality the user can select. The sole entity with persisted
/// client side state: saved wholesale under a single key, never mutated in
/// place, always replaced.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub state: RegionCode,
    pub ibge_code: GeoCode,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
}
