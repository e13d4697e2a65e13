//! Extended baseplate with corner mounting screws.

use gridfin::{BaseplateParams, GridfinityBaseplate};

fn main() {
    let plate = GridfinityBaseplate::new(BaseplateParams {
        length_u: 4,
        width_u: 3,
        ext_depth: 2.0,
        corner_screws: true,
        ..BaseplateParams::default()
    })
    .unwrap();

    let part = plate.render();
    let (x, y, z) = part.size();
    println!("{}: {:.1} x {:.1} x {:.1} mm", plate.filename(), x, y, z);

    let json = part.to_document().to_json().unwrap();
    let path = format!("{}.json", plate.filename());
    std::fs::write(&path, json).unwrap();
    println!("wrote {path}");
}
