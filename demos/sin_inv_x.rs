use std::{error::Error,
          fs::File,
          io::Write};
use graph_sampling::Sampling;


type R = Result<(), Box<dyn Error>>;

fn main() -> R {
    env_logger::init();
    let mut fh = File::create("/tmp/sin_inv_x.gp")?;
    write!(fh, "set terminal pngcairo\n\
                set grid\n")?;
    let mut d = 0;
    let mut save = |s: &Sampling, title: &str| -> R {
        d += 1;
        let fname = format!("/tmp/sin_inv_x{}.dat", d);
        s.write(&mut File::create(&fname)?)?;
        write!(fh, "set output \"sin_inv_x{}.png\"\n\
                    plot '{}' with l lt 1 lw 2 title \"{} ({} pts)\"\n",
               d, &fname, title, s.points().len())?;
        write!(fh, "set output \"sin_inv_x{}_p.png\"\n\
                    plot '{}' with l lt 5 lw 2 title \"{}\", \
                    '{}' with p lt 3 pt 5 ps 0.2 title \"points\"\n",
               d, &fname, title, &fname)?;
        Ok(())
    };

    let f = |x: f64| x * (1. / x).sin();
    let s = Sampling::graph(f, -0.4, 0.4)
        .view(-0.5, 0.5).pixel_width(320.).build();
    save(&s, "x sin(1/x)")?;
    let s = Sampling::graph(f, -0.4, 0.4)
        .view(-0.5, 0.5).pixel_width(640.).build();
    save(&s, "x sin(1/x)")?;

    let s = Sampling::graph(|x: f64| (1. / x).sin(), -0.4, 0.4)
        .view(-1.2, 1.2).pixel_width(640.).build();
    save(&s, "sin(1/x)")?;

    Ok(())
}
