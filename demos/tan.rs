use std::{error::Error,
          fs::File,
          io::Write};
use graph_sampling::Sampling;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let s = Sampling::graph(|x| x.tan(), -6.5, 6.5)
        .view(-5., 5.)
        .pixel_width(640.)
        .build();
    s.write(&mut File::create("/tmp/tan.dat")?)?;
    let lines = s.polylines();
    println!("tan: {} points, {} branches",
             s.points().len(), lines.len());

    let mut fh = File::create("/tmp/tan.gp")?;
    write!(fh, "set terminal pngcairo\n\
                set grid\n\
                set yrange [-5:5]\n\
                set output \"tan.png\"\n\
                plot '/tmp/tan.dat' with l lt 1 lw 2 title \"tan x\"\n")?;
    Ok(())
}
