//! Divided storage bin with scoops and label ledges — basic gridfin usage.

use gridfin::{BoxParams, GridfinityBox};

fn main() {
    let bin = GridfinityBox::new(BoxParams {
        length_u: 3,
        width_u: 2,
        height_u: 5,
        length_div: 2,
        width_div: 1,
        scoops: true,
        labels: true,
        holes: true,
        ..BoxParams::default()
    })
    .unwrap();

    let part = bin.render();
    let (x, y, z) = part.size();
    println!("{}: {:.1} x {:.1} x {:.1} mm", bin.filename(), x, y, z);

    let json = part.to_document().to_json().unwrap();
    let path = format!("{}.json", bin.filename());
    std::fs::write(&path, json).unwrap();
    println!("wrote {path}");
}
