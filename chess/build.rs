use std::path::Path;
use std::{env, io};

use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

pub fn default_gen() -> impl RngCore {
    Xoshiro256PlusPlus::seed_from_u64(0x800D_BA5E_5EED_1234_u64)
}

mod zobrist {
    use std::io::{self, BufWriter, Write};
    use std::{fs, path::Path};

    use raychess_base::types::Cell;
    use rand_core::RngCore;

    struct Zobrist {
        pieces: [[u64; 64]; Cell::COUNT],
        move_side: u64,
        castling: [u64; 16],
        enpassant: [u64; 64],
    }

    impl Zobrist {
        fn generate<R: RngCore>(gen: &mut R) -> Zobrist {
            let pieces = {
                let mut res = [[0_u64; 64]; Cell::COUNT];
                for sub in res.iter_mut().skip(1) {
                    for x in sub {
                        *x = gen.next_u64();
                    }
                }
                res
            };
            // Each castling flag gets its own key, a set of flags hashes as their XOR
            let castling = {
                let base = [(); 4].map(|_| gen.next_u64());
                let mut res = [0_u64; 16];
                for (i, val) in res.iter_mut().enumerate() {
                    for (j, base_val) in base.iter().enumerate() {
                        if (i >> j) & 1 != 0 {
                            *val ^= base_val;
                        }
                    }
                }
                res
            };
            Zobrist {
                pieces,
                move_side: gen.next_u64(),
                castling,
                enpassant: [(); 64].map(|_| gen.next_u64()),
            }
        }

        fn output<W: Write>(&self, w: &mut W) -> io::Result<()> {
            writeln!(w, "static PIECES: [[u64; 64]; Cell::COUNT] = [")?;
            for (i, sub) in self.pieces.iter().enumerate() {
                writeln!(w, "    /*{:2}*/ [", i)?;
                for (i, hsh) in sub.iter().enumerate() {
                    writeln!(w, "        /*{:2}*/ {:#x},", i, hsh)?;
                }
                writeln!(w, "    ],")?;
            }
            writeln!(w, "];\n")?;

            writeln!(w, "pub const MOVE_SIDE: u64 = {:#x};\n", self.move_side)?;

            writeln!(w, "static CASTLING: [u64; 16] = [")?;
            for (i, sub) in self.castling.iter().enumerate() {
                writeln!(w, "    /*{:2}*/ {:#x},", i, sub)?;
            }
            writeln!(w, "];\n")?;

            writeln!(w, "static ENPASSANT: [u64; 64] = [")?;
            for (i, sub) in self.enpassant.iter().enumerate() {
                writeln!(w, "    /*{:2}*/ {:#x},", i, sub)?;
            }
            writeln!(w, "];")?;

            Ok(())
        }
    }

    pub fn gen(out_path: &Path) -> io::Result<()> {
        let zobrist = Zobrist::generate(&mut super::default_gen());
        zobrist.output(&mut BufWriter::new(&fs::File::create(out_path)?))
    }
}

mod near_attacks {
    use std::io::{self, BufWriter, Write};
    use std::{fs, path::Path};

    use raychess_base::bitboard::Bitboard;
    use raychess_base::ray::Ray;
    use raychess_base::types::Square;

    fn generate(f: impl Fn(Bitboard) -> Bitboard) -> [Bitboard; 64] {
        let mut res = [Bitboard::EMPTY; 64];
        for sq in Square::iter() {
            res[sq.index()] = f(Bitboard::from_square(sq));
        }
        res
    }

    fn print_bitboards<W: Write>(w: &mut W, name: &str, bs: [Bitboard; 64]) -> io::Result<()> {
        writeln!(w, "static {}: [Bitboard; 64] = [", name)?;
        for (i, b) in bs.iter().enumerate() {
            writeln!(w, "    /*{:2}*/ bb(0x{:016x}),", i, b.as_raw())?;
        }
        writeln!(w, "];")?;
        Ok(())
    }

    pub fn gen(out_path: &Path) -> io::Result<()> {
        let f = fs::File::create(out_path)?;
        let mut w = BufWriter::new(&f);

        print_bitboards(&mut w, "KING_ATTACKS", generate(Bitboard::king_steps))?;
        writeln!(&mut w)?;
        print_bitboards(&mut w, "KNIGHT_ATTACKS", generate(Bitboard::knight_jumps))?;
        writeln!(&mut w)?;
        print_bitboards(
            &mut w,
            "WHITE_PAWN_ATTACKS",
            generate(|b| b.step(Ray::NE) | b.step(Ray::NW)),
        )?;
        writeln!(&mut w)?;
        print_bitboards(
            &mut w,
            "BLACK_PAWN_ATTACKS",
            generate(|b| b.step(Ray::SE) | b.step(Ray::SW)),
        )?;

        Ok(())
    }
}

mod rays {
    use std::io::{self, BufWriter, Write};
    use std::{fs, path::Path};

    use raychess_base::bitboard::Bitboard;
    use raychess_base::ray::Ray;
    use raychess_base::types::Square;

    /// Marks a pair of squares which do not share a line
    const NO_RAY: u8 = 0xff;

    fn build_rays() -> [[Bitboard; 64]; Ray::COUNT] {
        let mut res = [[Bitboard::EMPTY; 64]; Ray::COUNT];
        for ray in Ray::ALL {
            for sq in Square::iter() {
                res[ray.index()][sq.index()] = ray.squares_from(sq).collect();
            }
        }
        res
    }

    fn build_between() -> Vec<[u8; 64]> {
        let mut res = vec![[NO_RAY; 64]; 64];
        for src in Square::iter() {
            for ray in Ray::ALL {
                for dst in ray.squares_from(src) {
                    res[src.index()][dst.index()] = ray.index() as u8;
                }
            }
        }
        res
    }

    pub fn gen(out_path: &Path) -> io::Result<()> {
        let f = fs::File::create(out_path)?;
        let mut w = BufWriter::new(&f);

        writeln!(w, "static RAYS: [[Bitboard; 64]; Ray::COUNT] = [")?;
        for (ray, sub) in Ray::ALL.iter().zip(build_rays().iter()) {
            writeln!(w, "    /*{}*/ [", ray)?;
            for (i, b) in sub.iter().enumerate() {
                writeln!(w, "        /*{:2}*/ bb(0x{:016x}),", i, b.as_raw())?;
            }
            writeln!(w, "    ],")?;
        }
        writeln!(w, "];\n")?;

        writeln!(w, "const NO_RAY: u8 = {:#x};\n", NO_RAY)?;

        writeln!(w, "static RAY_BETWEEN: [[u8; 64]; 64] = [")?;
        for (i, row) in build_between().iter().enumerate() {
            let items: Vec<String> = row.iter().map(|x| format!("{:#x}", x)).collect();
            writeln!(w, "    /*{:2}*/ [{}],", i, items.join(", "))?;
        }
        writeln!(w, "];")?;

        Ok(())
    }
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    zobrist::gen(&Path::new(&out_dir).join("zobrist.rs"))?;
    near_attacks::gen(&Path::new(&out_dir).join("near_attacks.rs"))?;
    rays::gen(&Path::new(&out_dir).join("rays.rs"))?;

    Ok(())
}
