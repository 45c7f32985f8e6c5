//! Wave names of the D2 sound engine, group 1 then group 2.

/// Indexed by wave number; entries from `WAVE_GROUP_SIZE` on are group 2.
pub const WAVE_NAMES: [&str; 505] = [
    "TB Dst Saw",
    "TB Dst Sqr 1",
    "TB Dst Sqr 2",
    "TB Reso Sqr 1",
    "TB Reso Sqr 2",
    "TB Saw",
    "TB Solid Saw 1",
    "TB Solid Saw 2",
    "TB Square 1",
    "TB Square 2",
    "TB Sqr Decay",
    "TB Natural",
    "JP8000 Saw 1",
    "JP8000 Saw 2",
    "MG Saw",
    "Synth Saw 1",
    "JP-8 Saw",
    "P5 Saw",
    "Synth Saw 2",
    "OB Saw",
    "D-50 Saw",
    "JP-6 Square",
    "MG Square",
    "P5 Square",
    "JP-8 Pulse",
    "JP-6 Pulse",
    "MG Pulse",
    "260 Pulse",
    "JU-2 Sub OSC",
    "Frog wave",
    "Digiwave",
    "FM Pulse",
    "JP8000 PWM",
    "JP8000 FBK",
    "260 Sub OSC",
    "Dist Synth",
    "Dist Square",
    "MG Triangle",
    "Jungle Bass",
    "260 Sine Bs",
    "MC-202 Bass",
    "SH-101 Bass",
    "Octa Bass",
    "Funky Bass",
    "Poly Bass",
    "MG Bass",
    "FM Super Bass",
    "Solid Bass",
    "Organ Bass",
    "Dirty Bass",
    "Upright Bass",
    "Ac Bass",
    "Voco Bass",
    "Fingered Bass",
    "Pick Bass",
    "Fretless Bass",
    "Slap Bass",
    "Juno Rave",
    "Blaster",
    "Fat JP-6",
    "OB Strings",
    "Orch Strings",
    "Pizzy Techno",
    "Choir",
    "Syn Vox 1",
    "Syn Vox 2",
    "Syn Vox 3",
    "Ac Piano",
    "D-50 EP",
    "E Piano",
    "Clavi",
    "Full Stop",
    "FM Club Org",
    "E Organ 1",
    "E Organ 2",
    "Church Org",
    "Power B fst",
    "Power B slw",
    "Org Chord",
    "Tabular",
    "Glockenspiel",
    "Vibraphone",
    "FantabellSub",
    "DIGI Bell",
    "Steel Drum",
    "Marimba",
    "Balaphone",
    "Kalimba",
    "Steel Gtr",
    "Clean TC",
    "Dst Solo Gtr",
    "Dist Tek Gtr",
    "Gtr FX",
    "Harmo Gtr",
    "Wah Gtr 1",
    "Wah Gtr 2",
    "Wah Gtr 2a",
    "Wah Gtr 2b",
    "Wah Gtr 2c",
    "Wah Gtr 2d",
    "Sitar",
    "Brass",
    "Trumpet",
    "Mute Trumpet",
    "Soprano Sax",
    "Solo Sax",
    "Baritone Sax",
    "Brass Fall",
    "Flute",
    "Pan Flute",
    "Shakunichi",
    "Bagpipe",
    "Breath",
    "FeedbackWave",
    "Atmosphere",
    "Reso Noise",
    "MG White Nz",
    "P5 Noise",
    "MG Pink Nz",
    "Bomb Noise",
    "Sea",
    "Brush Noise",
    "Space Noise",
    "Scream",
    "Jet Plane",
    "Toy Gun 1",
    "Crash",
    "Toy Gun 2",
    "Toy Gun 3",
    "Emergency",
    "Buzzer",
    "Insect",
    "Tonality",
    "Ring OSC",
    "Reso FX",
    "Scratch Menu",
    "Vinyl Noise",
    "Scratch BD f",
    "Scratch BD r",
    "Scratch SD f",
    "Scratch SD r",
    "Scratch Alt",
    "Tape Rewind",
    "Vinyl Stop",
    "Hit Menu",
    "MG Blip",
    "Beam HiQ",
    "MG Attack",
    "Air Blip",
    "Org Click",
    "Syn Hit",
    "Techno Scene",
    "Techno Chord",
    "Dist Hit",
    "Thin Beef",
    "Tekno Hit",
    "Back Hit",
    "TAO Hit",
    "Phily Hit",
    "INDUST MENU",
    "Analog Bird",
    "Retro UFO",
    "PC-2 Machine",
    "Hoo",
    "Metal Sweep",
    "Afro Feet",
    "Bomb",
    "Bounce",
    "Electric Dunk",
    "Iron Door",
    "Dist Swish",
    "Drill Hit",
    "Thrill",
    "PCM Press",
    "Air Gun",
    "Voice Menu",
    "One!",
    "Two!",
    "Three!",
    "Kick it!",
    "Come on!",
    "Wao!",
    "Shout",
    "Ooh! 1",
    "Ooh! 2",
    "Voice Loop",
    "Pa!",
    "Canvas",
    "Punch",
    "Chiki!",
    "Hey!",
    "Laugh",
    "Aah Formant",
    "Eeh Formant",
    "Iih Formant",
    "Ooh Formant",
    "Uuh Formant",
    "Dist Ooh Vox",
    "Auh Voice",
    "Stream",
    "Bird",
    "Tom Menu",
    "TR909 Tom",
    "TR909 DstTom",
    "TR808 Tom",
    "TR606 Tom",
    "TR606 CmpTom",
    "TR707 Tom",
    "Syn Tom",
    "Deep Tom",
    "Can Tom",
    "Kick Tom",
    "Natural Tom",
    "PERCUS MENU1",
    "PERCUS MENU2",
    "TR808 Conga",
    "HiBongo Open",
    "LoBongo Open",
    "HiConga Mute",
    "HiConga Open",
    "LoConga Open",
    "HiBongo LoFi",
    "LoBongo Lofi",
    "HiConga Mt LF",
    "HiConga Op LF",
    "Loconga LoFi",
    "Timpani",
    "Mute Surdo",
    "Open Surdo",
    "Hi Timbale",
    "Lo Timbale",
    "Hi Timbale LF",
    "Lo Timbale LF",
    "Tabla",
    "TablaBaya",
    "Udo",
    "AfroDrum Rat",
    "ChenChen",
    "Op Pandeiro",
    "Mt Pandeiro",
    "Tambourine 1",
    "Tambourine 2",
    "Tambourine 3",
    "Tambourine 4",
    "CR78 Tamb",
    "Cowbell MENU",
    "TR808Cowbell",
    "TR707Cowbell",
    "CR78Cowbell",
    "Cowbell",
    "TR727 Agogo",
    "CR78 Beat",
    "Triangle 1",
    "Triangle 2",
    "SHKR+ Menu",
    "808 Maracas",
    "Maracas",
    "Cabasa Up",
    "TechnoShaker",
    "TR626Shaker",
    "DanceShaker",
    "CR78 Guiro",
    "Long Guiro",
    "Short Guiro",
    "Mute Cuica",
    "Open Cuica",
    "Whistle",
    "TR727Quijada",
    "Jingle Bell",
    "Belltree",
    "Wind Chime",
    "RIM MENU",
    "TR909 RIM",
    "TR808 RIM",
    "TR808 RimLng",
    "TR707 Rim",
    "Analog Rim",
    "Natural Rim",
    "Ragga Rim 1",
    "Lo-Fi Rim",
    "Wood Block",
    "Jungle Snap",
    "TR808 Claves",
    "Hyoshigi",
    "CHH MENU 1",
    "CHH MENU 2",
    "TR909 CHH 1",
    "TR909 CHH 2",
    "TR808 CHH 1",
    "TR808 CHH 2",
    "TR808 CHH 3",
    "TR606 CHH 1",
    "TR606 CHH 2",
    "TR606 DstCHH",
    "TR707 CHH",
    "CR78 CHH",
    "DR55 CHH 1",
    "Closed Hat",
    "Pop CHH",
    "Real CHH",
    "Bristol CHH",
    "DR550 CHH2",
    "Tight CHH",
    "Hip CHH",
    "Room CHH",
    "R8 Brush CHH",
    "Jungle Hat",
    "PHH MENU",
    "TR909 PHH 1",
    "TR909 PHH 2",
    "TR808 PHH 1",
    "TR808 PHH 2",
    "TR606 PHH 1",
    "TR606 PHH 2",
    "TR707 PHH",
    "HIP PHH",
    "Tight PHH",
    "Pedal Hat 1",
    "Real PHH",
    "Pedal Hat 2",
    "OHH MENU 1",
    "OHH MENU 2",
    "TR909 OHH 1",
    "TR909 OHH 2",
    "TR909 OHH 3",
    "TR909 DstOHH",
    "TR808 OHH 1",
    "TR808 OHH 2",
    "TR606 OHH",
    "TR606 DstOHH",
    "TR707 OHH",
    "CR78 OHH",
    "HIP OHH",
    "Pop Hat Open",
    "Open Hat",
    "Cym OHH",
    "DR550 OHH",
    "Funk OHH",
    "Real OHH",
    "R8 OHH",
    "Cymbal MENU",
    "TR606 Cym 1",
    "TR606 Cym 2",
    "TR909 Ride",
    "TR707 Ride",
    "Natural Ride",
    "Cup Cym",
    "TR909 Crash",
    "Natural Crash",
    "Jungle Crash",
    "Asian Gong",
    "CLAP MENU1",
    "CLAP MENU2",
    "TR909 Clap 1",
    "TR909 Clap 2",
    "TR808 Clap",
    "TR707 Clap",
    "Cheap Clap",
    "Funk Clap",
    "Little Clap",
    "Real Clap 1",
    "Real Clap 2",
    "Funky Clap",
    "Comp Clap",
    "Hip Clap",
    "Down Clap",
    "Group Clap",
    "Big Clap",
    "ClapTail",
    "Clap Snare 1",
    "Fuzzy Clap",
    "Snap",
    "Finger Snap",
    "SNR MENU 1",
    "SNR MENU 2",
    "SNR MENU 3",
    "SNR MENU 4",
    "SNR MENU 5",
    "SNR MENU 6",
    "TR909 Snr 1",
    "TR909 Snr 2",
    "TR909 Snr 3",
    "TR909 Snr 4",
    "TR909 Snr 5",
    "TR909 Snr 6",
    "TR909 Snr 7",
    "TR909 DstSnr",
    "TR808 Snr 1",
    "TR808 Snr 2",
    "TR808 Snr 3",
    "TR808 Snr 4",
    "TR808 Snr 5",
    "TR808 Snr 6",
    "TR808 Snr 7",
    "TR808 Snr 8",
    "TR808 Snr 9",
    "TR606 Snr 1",
    "TR606 Snr 2",
    "TR606 Snr 3",
    "DanceHall SD",
    "TR707 Snare",
    "CR78 Snare",
    "Clap Snare 2",
    "Jungle Tiny SD",
    "Jazz Snare",
    "Headz Snare",
    "Whack Snare",
    "Rap Snare",
    "Jungle Snr 1",
    "Antigua Snr",
    "Real Snr",
    "Tiny Snare 1",
    "Tiny Snare 2",
    "Break Snare 1",
    "Break Snare 2",
    "MC Snare",
    "East Snare",
    "Phat Snare",
    "Brush Slap 1",
    "Brush Slap 2",
    "Deep Snare",
    "Fat Snare",
    "Disco Snare",
    "Dj Snare",
    "Macho Snare",
    "Hash Snare",
    "Lo-Hard Snr",
    "Indus Snare",
    "Rage Snare",
    "TekRok Snare",
    "Big Trash SD",
    "Ragga Rim 2",
    "Gate Rim",
    "Sidestiker",
    "HipJazz Snr",
    "HH Soul Snr",
    "Cross Snr",
    "Jungle Rim 1",
    "Ragg Snr 2",
    "Upper Snare",
    "Lo-Fi Snare",
    "Ragga Tight SD",
    "Flange Snr",
    "Machine Snr",
    "Clap Snare 3",
    "Solid Snare",
    "Funk Clap 2",
    "Jungle Rim 2",
    "Jungle Rim 3",
    "Jungle Snr 2",
    "Urban Snare",
    "Urban RollSD",
    "R&B Snare",
    "R8 Brush Tap",
    "R8 BrshSwill",
    "R8 BrushRoll",
    "Sim Snare",
    "Electro Snr 1",
    "Electro Snr 2",
    "Synth Snr",
    "Roll Snare",
    "Kick MENU 1",
    "KICK MENU 2",
    "KICK MENU 3",
    "TR909 Kick 1",
    "TR909 Kick 2",
    "TR909 Kick 3",
    "TR909 Kick 4",
    "Plastic BD 1",
    "Plastic BD 2",
    "Plastic BD 3",
    "Plastic BD 4",
    "TR909 Kick 5",
    "TR808 Kick 1",
    "TR808 Kick 2",
    "TR808 Kick 3",
    "TR808 Kick 4",
    "TR808 Kick 5",
    "TR606 Kick",
    "TR606 Dst BD",
    "TR707 Kick 1",
    "TR707 Kick 2",
    "Toy Kick",
    "Analog Kick",
    "Boost Kick",
    "West Kick",
    "Jungle Kick 1",
    "Optic Kick",
    "Wet Kick",
    "Lo-Fi Kick",
    "Hazy Kick",
    "Hip Kick",
    "Video Kick",
    "Tight Kick",
    "Break Kick",
    "Turbo Kick",
    "Ele Kick",
    "Dance Kick 1",
    "Kick Ghost",
    "Lo-Fi Kick 2",
    "Jungle Kick 2",
    "TR909 Dst BD",
    "Amsterdam BD",
    "Gabba Kick",
    "Roll Kick",
];
