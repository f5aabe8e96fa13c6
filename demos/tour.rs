//! A quick tour of the notation: parse a document, inspect it, mutate it,
//! and print both renderings.
//!
//! Run with: `cargo run --example tour`

use collex::{collection, from_str, Value};

fn main() -> collex::Result<()> {
    let text = r#"
        <
            name: "Ann";
            age: 30;
            tags: "reader", "writer";
            joined: 2024-01-15T10:30:00+0000;
            profile: <theme: "dark"; lines: 120;>;
        >
    "#;

    let mut doc = from_str(text)?;

    println!("keys: {:?}", doc.keys().collect::<Vec<_>>());
    println!("name: {:?}", doc.strings("name")?);
    println!("age:  {:?}", doc.ints("age")?);
    println!("tags: {:?}", doc.strings("tags")?);
    println!("joined: {:?}", doc.timestamps("joined")?);

    let mut profiles = doc.collections("profile")?;
    println!("theme: {:?}", profiles[0].strings("theme")?);

    doc.append("tags", Value::from("editor"))?;
    doc.put_one("active", Value::from(true))?;
    doc.remove("joined");

    println!("\ninline:\n{}", doc.render(0)?);
    println!("\npretty:\n{}", doc.render(2)?);

    let mut built = collection! {
        "endpoint" => "https://example.net",
        "retries" => 3,
        "backoff" => [0.5, 1.0, 2.0],
    };
    println!("\nbuilt:\n{}", built.render(2)?);

    Ok(())
}
