use opennow_core::{Amenity, Coordinate};

/// Builds the Overpass QL text for all nodes, ways and relations tagged
/// `amenity=<amenity>` within `radius_m` of `center`.
///
/// `out center tags` makes the server attach a centroid to ways and
/// relations, so every element can be placed on the map.
#[must_use]
pub fn build_overpass_query(
    amenity: Amenity,
    center: Coordinate,
    radius_m: u32,
    server_timeout_secs: u64,
) -> String {
    let tag = amenity.osm_tag();
    let around = format!("(around:{radius_m},{},{})", center.lat, center.lon);
    format!(
        "[out:json][timeout:{server_timeout_secs}];\n\
         (\n  \
           node[\"amenity\"=\"{tag}\"]{around};\n  \
           way[\"amenity\"=\"{tag}\"]{around};\n  \
           relation[\"amenity\"=\"{tag}\"]{around};\n\
         );\n\
         out center tags;\n"
    )
}
