//! Example: Laying out a scene built in code
//!
//! This example demonstrates how to assemble a scene from the scene model
//! types directly, without reading JSON, and lay it out.

use schemplace::{
    Placer,
    config::{AppConfig, LayoutConfig, OutputConfig},
    identifier::Id,
    scene::{Connection, Net, Port, Scene, SchematicBox},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building scene from the scene model...\n");

    // An op-amp with inputs on the left and output and supply on the right
    let opamp_id = Id::new("U1");
    let opamp = SchematicBox::new(
        opamp_id,
        vec![
            Port::new(opamp_id.create_port("in_p"), -1.0, -0.5),
            Port::new(opamp_id.create_port("in_n"), -1.0, 0.5),
            Port::new(opamp_id.create_port("out"), 1.0, 0.0),
            Port::new(opamp_id.create_port("vcc"), 1.0, 1.0),
        ],
    );

    // Two-port passives, declared vertically on purpose
    let passive = |name: &str| {
        let id = Id::new(name);
        SchematicBox::new(
            id,
            vec![
                Port::new(id.create_port("1"), 0.0, -0.5),
                Port::new(id.create_port("2"), 0.0, 0.5),
            ],
        )
    };

    let connections = vec![
        Connection::new("R1.2", "U1.in_p"),
        Connection::new("R2.1", "U1.in_n"),
        Connection::new("R3.1", "U1.out"),
        Connection::new("C1.1", "U1.vcc"),
        Connection::new("R1.1", "gnd"),
        Connection::new("R2.2", "gnd"),
        Connection::new("C1.2", "gnd"),
    ];

    let scene = Scene::new(
        vec![
            opamp,
            passive("R1"),
            passive("R2"),
            passive("R3"),
            passive("C1"),
        ],
        connections,
        vec![Net::new("gnd")],
    );

    // Print scene info
    println!("Created scene:");
    println!("  Boxes: {}", scene.boxes.len());
    println!("  Connections: {}", scene.connections.len());
    println!("  Nets: {}", scene.nets.len());
    println!();

    // Lay out the scene using Placer
    println!("Laying out...");
    let placer = Placer::new(AppConfig::new(
        LayoutConfig::default(),
        OutputConfig::new(true),
    ));
    let placed = placer.layout(&scene)?;

    for b in &placed.boxes {
        match b.placement {
            Some(p) => println!(
                "  {:<24} ({:>6.2}, {:>6.2})  {} #{}",
                b.box_id.to_string(),
                b.x,
                b.y,
                p.side.as_str(),
                p.ascending_box_index
            ),
            None => println!("  {:<24} ({:>6.2}, {:>6.2})  central", b.box_id.to_string(), b.x, b.y),
        }
    }
    println!();

    // Write to file
    let output_path = "from_scene_output.json";
    std::fs::write(output_path, placer.to_json(&placed)?)?;
    println!("Scene written to: {}", output_path);

    Ok(())
}
