use crate::cli::DescribeArgs;
use crate::config::builder::build_describe_config;
use crate::error::Result;
use mlexp::core::descriptors::Descriptor;
use mlexp::core::io::traits::MolecularFile;
use mlexp::core::io::xyz::XyzFile;
use mlexp::engine::batch::{Tables, describe_molecule};
use tracing::info;

pub fn run(args: DescribeArgs) -> Result<()> {
    let app = build_describe_config(&args)?;
    let (elements, bonds) = super::load_tables(&app.tables)?;

    info!("Reading molecule from {:?}", &app.input);
    let molecule = XyzFile::read_from_path(&app.input)?;

    let descriptor = describe_molecule(
        &molecule,
        &app.descriptor,
        Tables {
            elements: &elements,
            bonds: &bonds,
        },
    )?;
    info!(
        kind = %app.descriptor.kind,
        shape = ?descriptor.shape(),
        "Descriptor computed for '{}'.",
        molecule.name()
    );

    print!("{}", format_descriptor(&descriptor));
    Ok(())
}

/// One line per matrix row, or a single line for vectors.
fn format_descriptor(descriptor: &Descriptor) -> String {
    let join = |values: &mut dyn Iterator<Item = f64>| {
        values
            .map(|v| format!("{:.6}", v))
            .collect::<Vec<_>>()
            .join(" ")
    };

    match descriptor {
        Descriptor::Matrix(matrix) => matrix
            .row_iter()
            .map(|row| join(&mut row.iter().copied()) + "\n")
            .collect(),
        Descriptor::Vector(vector) => join(&mut vector.iter().copied()) + "\n",
    }
}
