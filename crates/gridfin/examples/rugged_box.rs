//! Rugged box part set: body, lid, accessories and the full assembly.

use gridfin::GridfinityRuggedBox;

fn main() {
    let rb = GridfinityRuggedBox::sized(5, 4, 6).unwrap();

    for (label, doc) in [
        ("body", rb.render().to_document()),
        ("lid", rb.render_lid().to_document()),
        ("acc", rb.render_accessories()),
        ("assembly", rb.render_assembly()),
    ] {
        let path = format!("{}_{label}.json", rb.filename());
        std::fs::write(&path, doc.to_json().unwrap()).unwrap();
        println!("wrote {path}");
    }
}
