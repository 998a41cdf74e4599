#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("seed_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use flowvis_engine::config::PreprocessConfig;
    use flowvis_engine::field::lattice::generate_with_limit;
    use flowvis_engine::field::{DatasetPreset, SeedPoint, sphere_cloud};
    use flowvis_engine::parse::scene_xml;
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::PathBuf;

    const USAGE: &str = r#"seed_cli (flowvis-engine)

USAGE:
  seed_cli presets
  seed_cli lattice <dataset> [--spacing <s>] [--out <path>]
  seed_cli cloud [--center x,y,z] [--radius r] [--count n] [--seed s] [--out <path>]
  seed_cli scale <scene.xml> [--target t]

OPTIONS:
  --out <path>       Write points to a file instead of stdout
  --overwrite        Overwrite an existing output file
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "presets" => {
                print_presets();
                Ok(())
            }
            "lattice" => cmd_lattice(&mut args),
            "cloud" => cmd_cloud(&mut args),
            "scale" => cmd_scale(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_presets() {
        for preset in DatasetPreset::ALL {
            let (x, y, z) = preset.extents();
            match z {
                Some(z) => println!("{:<10} {x} x {y} x {z}  spacing {}", preset.name(), preset.default_spacing()),
                None => println!("{:<10} {x} x {y}  spacing {}", preset.name(), preset.default_spacing()),
            }
        }
    }

    fn cmd_lattice(args: &mut Args) -> Result<(), String> {
        let name = args.next().ok_or("missing dataset name")?;
        let preset = name
            .parse::<DatasetPreset>()
            .map_err(|_| unknown_dataset(&name))?;

        let mut spacing = preset.default_spacing();
        let mut output = Output::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--spacing" => spacing = parse_number(&args.value("--spacing")?, "--spacing")?,
                "--out" => output.path = Some(PathBuf::from(args.value("--out")?)),
                "--overwrite" => output.overwrite = true,
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let config = PreprocessConfig::default();
        let points = generate_with_limit(&preset.lattice(spacing), config.max_seed_points)
            .map_err(|e| e.to_string())?;
        output.write_points(&points)
    }

    fn cmd_cloud(args: &mut Args) -> Result<(), String> {
        let mut spec = DatasetPreset::Carotid
            .point_source()
            .ok_or("carotid preset has no point source")?;
        let mut output = Output::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--center" => spec.center = parse_center(&args.value("--center")?)?,
                "--radius" => spec.radius = parse_number(&args.value("--radius")?, "--radius")?,
                "--count" => {
                    spec.count = args
                        .value("--count")?
                        .parse()
                        .map_err(|e| format!("--count: {e}"))?;
                }
                "--seed" => {
                    spec.seed = args
                        .value("--seed")?
                        .parse()
                        .map_err(|e| format!("--seed: {e}"))?;
                }
                "--out" => output.path = Some(PathBuf::from(args.value("--out")?)),
                "--overwrite" => output.overwrite = true,
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let points = sphere_cloud(&spec).map_err(|e| e.to_string())?;
        output.write_points(&points)
    }

    fn cmd_scale(args: &mut Args) -> Result<(), String> {
        let path = PathBuf::from(args.next().ok_or("missing scene path")?);
        let mut target: Option<f64> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--target" => target = Some(parse_number(&args.value("--target")?, "--target")?),
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let xml = fs::read_to_string(&path)
            .map_err(|e| format!("read {}: {e}", path.display()))?;
        let report = scale_scene(&xml, target)?;
        eprintln!(
            "{}: {} vectors, {} lattice seeds, {} cloud seeds",
            report.preset, report.vectors, report.lattice_seeds, report.cloud_seeds
        );
        println!("{}", report.scale_factor);
        Ok(())
    }

    #[derive(Debug)]
    struct ScaleReport {
        preset: DatasetPreset,
        vectors: usize,
        scale_factor: f64,
        lattice_seeds: usize,
        cloud_seeds: usize,
    }

    fn scale_scene(xml: &str, target: Option<f64>) -> Result<ScaleReport, String> {
        let mut scene = scene_xml::parse_str(xml).map_err(|e| e.to_string())?;
        if let Some(target) = target {
            scene.config.target_magnitude = target;
        }

        let mut session = scene.into_session().map_err(|e| e.to_string())?;
        let preset = session.preset();
        let vectors = session.field().len();
        let outputs = session.evaluate().map_err(|e| e.to_string())?;
        Ok(ScaleReport {
            preset,
            vectors,
            scale_factor: outputs.scale_factor,
            lattice_seeds: outputs.lattice_seeds.len(),
            cloud_seeds: outputs.cloud_seeds.len(),
        })
    }

    #[derive(Default)]
    struct Output {
        path: Option<PathBuf>,
        overwrite: bool,
    }

    impl Output {
        fn write_points(&self, points: &[SeedPoint]) -> Result<(), String> {
            match self.path.as_ref() {
                Some(path) => {
                    if path.exists() && !self.overwrite {
                        return Err(format!(
                            "refusing to overwrite existing file: {} (pass --overwrite)",
                            path.display()
                        ));
                    }
                    let file = File::create(path)
                        .map_err(|e| format!("create {}: {e}", path.display()))?;
                    write_points_to(BufWriter::new(file), points)
                        .map_err(|e| format!("write {}: {e}", path.display()))?;
                    eprintln!("wrote {} points to {}", points.len(), path.display());
                    Ok(())
                }
                None => write_points_to(BufWriter::new(io::stdout().lock()), points)
                    .map_err(|e| format!("write stdout: {e}")),
            }
        }
    }

    fn write_points_to(mut writer: impl Write, points: &[SeedPoint]) -> io::Result<()> {
        for point in points {
            writeln!(writer, "{} {} {}", point.x, point.y, point.z)?;
        }
        writer.flush()
    }

    fn parse_number(raw: &str, flag: &str) -> Result<f64, String> {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| format!("{flag}: {e}"))
    }

    fn parse_center(raw: &str) -> Result<[f64; 3], String> {
        let parts = raw
            .split(',')
            .map(|part| parse_number(part, "--center"))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [x, y, z] => Ok([*x, *y, *z]),
            _ => Err(format!("--center expects x,y,z, got `{raw}`")),
        }
    }

    fn unknown_dataset(name: &str) -> String {
        let mut msg = format!("unknown dataset `{name}`\n\navailable datasets:\n");
        for preset in DatasetPreset::ALL {
            msg.push_str(&format!("  {}\n", preset.name()));
        }
        msg
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }

}
