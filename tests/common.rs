// Not every test file uses every item
#![allow(unused)]

pub use self::{fixtures::*, mods::*};

/// Mod combinations used throughout the tests
mod mods {
    use beatmap_pp::GameMods;

    pub const NM: GameMods = GameMods::NM;
    pub const NF: GameMods = GameMods::NF;
    pub const EZ: GameMods = GameMods::EZ;
    pub const HD: GameMods = GameMods::HD;
    pub const HR: GameMods = GameMods::HR;
    pub const DT: GameMods = GameMods::DT;
    pub const HT: GameMods = GameMods::HT;
    pub const FL: GameMods = GameMods::FL;
    pub const K4: GameMods = GameMods::K4;
    pub const K7: GameMods = GameMods::K7;
}

/// Content of small `.osu` files
mod fixtures {
    pub const SINGLE_CIRCLE: &str = "osu file format v14

[Difficulty]
ApproachRate:5

[HitObjects]
256,192,0,1,0
";

    pub const EMPTY: &str = "osu file format v14

[General]
Mode: 0

[Difficulty]
HPDrainRate:5
CircleSize:4
OverallDifficulty:5
ApproachRate:5
";

    pub const OSU: &str = "osu file format v14

[General]
StackLeniency: 0.7
Mode: 0

[Difficulty]
HPDrainRate:6
CircleSize:4
OverallDifficulty:8
ApproachRate:9.3
SliderMultiplier:1.8
SliderTickRate:1

[Events]
2,3000,4000

[TimingPoints]
0,333.333333333333,4,2,1,60,1,0
2000,-50,4,2,1,60,0,1

[HitObjects]
64,64,0,1,0,0:0:0:0:
448,64,166,1,2,0:0:0:0:
448,320,333,1,0,0:0:0:0:
64,320,500,2,0,B|128:200|256:256,1,180
256,192,1000,1,4,0:0:0:0:
300,100,1166,1,0,0:0:0:0:
200,300,1333,2,0,L|400:300,2,150
100,100,2333,1,0,0:0:0:0:
400,100,2500,1,8,0:0:0:0:
256,192,4000,12,0,5000,0:0:0:0:
128,192,5333,1,0,0:0:0:0:
384,192,5500,6,0,P|300:100|200:200,1,200
";

    pub const TAIKO: &str = "osu file format v14

[General]
Mode: 1

[Difficulty]
HPDrainRate:6
CircleSize:5
OverallDifficulty:6
ApproachRate:5
SliderMultiplier:1.4
SliderTickRate:1

[TimingPoints]
0,300,4,2,1,60,1,0

[HitObjects]
256,192,0,1,0,0:0:0:0:
256,192,150,1,2,0:0:0:0:
256,192,300,1,8,0:0:0:0:
256,192,450,1,0,0:0:0:0:
256,192,600,1,4,0:0:0:0:
256,192,750,1,10,0:0:0:0:
256,192,900,1,0,0:0:0:0:
256,192,1050,1,2,0:0:0:0:
256,192,1200,2,0,L|356:192,1,100
256,192,2400,12,0,3000,0:0:0:0:
256,192,3300,1,0,0:0:0:0:
256,192,3450,1,8,0:0:0:0:
";

    pub const CATCH: &str = "osu file format v14

[General]
Mode: 2

[Difficulty]
HPDrainRate:5
CircleSize:4
OverallDifficulty:7
ApproachRate:8
SliderMultiplier:1.6
SliderTickRate:2

[TimingPoints]
0,400,4,2,1,60,1,0

[HitObjects]
64,192,0,1,0,0:0:0:0:
448,192,400,1,0,0:0:0:0:
128,192,800,2,0,L|384:192,1,240
256,192,2000,1,0,0:0:0:0:
480,192,2200,1,0,0:0:0:0:
32,192,2400,2,0,B|200:100|300:300,2,200
256,192,4500,12,0,5500,0:0:0:0:
";

    pub const MANIA: &str = "osu file format v14

[General]
Mode: 3

[Difficulty]
HPDrainRate:7
CircleSize:4
OverallDifficulty:8
ApproachRate:5
SliderMultiplier:1.4
SliderTickRate:1

[TimingPoints]
0,250,4,2,1,60,1,0

[HitObjects]
64,192,0,1,0,0:0:0:0:
192,192,125,1,0,0:0:0:0:
320,192,250,1,0,0:0:0:0:
448,192,375,1,0,0:0:0:0:
64,192,500,128,0,1000:0:0:0:0:
192,192,500,1,0,0:0:0:0:
320,192,625,1,0,0:0:0:0:
448,192,750,1,0,0:0:0:0:
192,192,875,1,0,0:0:0:0:
320,192,1000,128,0,1500:0:0:0:0:
448,192,1125,1,0,0:0:0:0:
64,192,1250,1,0,0:0:0:0:
";
}

#[track_caller]
pub fn assert_eq_float<F: Float>(a: F, b: F) {
    assert!((a - b).abs() < F::EPSILON, "{a} != {b}")
}

/// Trait to provide flexibility in the `assert_eq_float` function.
pub trait Float:
    Copy + std::fmt::Display + std::ops::Sub<Output = Self> + PartialOrd + Sized
{
    const EPSILON: Self;

    fn abs(self) -> Self;
}

macro_rules! impl_float {
    ( $( $ty:ty )* ) => {
        $(
            impl Float for $ty {
                const EPSILON: Self = Self::EPSILON;

                fn abs(self) -> Self {
                    self.abs()
                }
            }
        )*
    }
}

impl_float!(f32 f64);
