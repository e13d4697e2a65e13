//! Spacer set best-fitted to a drawer interior.

use gridfin::{GridfinityDrawerSpacer, SpacerParams};

fn main() {
    // A typical workshop drawer: 582 x 481 mm inside.
    let spacer = GridfinityDrawerSpacer::fitted(582.0, 481.0, SpacerParams::default());

    let (ux, uy) = spacer.size_u();
    println!(
        "{}: {ux} x {uy} units, strips {:.1} / {:.1} mm thick",
        spacer.filename(),
        spacer.length_th(),
        spacer.width_th()
    );

    let part = spacer.render_full_set(true);
    let json = part.to_document().to_json().unwrap();
    let path = format!("{}.json", spacer.filename());
    std::fs::write(&path, json).unwrap();
    println!("wrote {path}");
}
