use clap::App;
use mandelterm::export::{self, ExportJob};
use mandelterm::{EscapeTime, Scheduler, Settings, Viewport};

fn main() {
    env_logger::init();
    let matches = App::new("mandel-export")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Headless Mandelbrot bitmap exporter")
        .args(&Settings::args())
        .args(&Settings::corner_args())
        .get_matches();

    let settings = Settings::from_matches(&matches).expect("Error parsing settings");
    let (leftlower, rightupper) = Settings::corners(&matches).expect("Error parsing corners");

    let viewport = match Viewport::from_corners(leftlower, rightupper, settings.resolution) {
        Ok(viewport) => viewport,
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    };
    let job: ExportJob = settings.job();
    let scheduler = Scheduler::new(settings.threads);

    match export::export(&viewport, &job, &scheduler, &EscapeTime) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(frame) => {
            println!(
                "Wrote {}x{} image to {}",
                frame.columns,
                frame.rows,
                settings.output.display()
            );
        }
    }
}
