//! Star map: the fixed set of systems and their gate links.

pub struct SystemData {
    pub name: &'static str,
    pub security: f32,
    /// Destination system indices, one stargate each
    pub gates: &'static [usize],
    pub station: &'static str,
    /// Position on the galaxy map
    pub map: (f32, f32),
}

const fn system(
    name: &'static str,
    security: f32,
    gates: &'static [usize],
    station: &'static str,
    map: (f32, f32),
) -> SystemData {
    SystemData { name, security, gates, station, map }
}

pub static SYSTEMS: &[SystemData] = &[
    system("Jita", 1.0, &[1, 2], "Jita IV - Caldari Navy Assembly Plant", (380.0, 200.0)),
    system("Amarr", 1.0, &[0, 3, 5], "Amarr VIII - Emperor Family Academy", (310.0, 270.0)),
    system("Dodixie", 0.9, &[0, 4, 6], "Dodixie IX - Moon 20 - Federation Navy", (450.0, 270.0)),
    system("Rens", 0.9, &[1, 7], "Rens VI - Moon 8 - Brutor Tribe Treasury", (240.0, 270.0)),
    system("Hek", 0.8, &[2, 8], "Hek VIII - Moon 12 - Boundless Creation", (520.0, 270.0)),
    system("Perimeter", 0.9, &[1, 9], "Perimeter Trading Hub", (310.0, 340.0)),
    system("Oursulaert", 0.7, &[2, 10], "Oursulaert VII - Moon 1", (450.0, 340.0)),
    system("Lustrevik", 0.6, &[3, 11], "Lustrevik VII - Moon 9", (170.0, 270.0)),
    system("Tama", 0.3, &[4, 7, 12], "Tama Outpost", (590.0, 270.0)),
    system("Amamake", 0.4, &[5, 13], "Amamake II - Republic Fleet Assembly", (310.0, 410.0)),
    system("Rancer", 0.4, &[6, 14], "Rancer Trading Post", (450.0, 410.0)),
    system("Old Man Star", 0.3, &[7, 15], "Old Man Star Station", (100.0, 270.0)),
    system("Egghelende", 0.2, &[8, 16], "Egghelende VII - Moon 20", (660.0, 270.0)),
    system("Huola", 0.3, &[9, 17], "Huola Factional Warfare Base", (310.0, 480.0)),
    system("NOL-M9", 0.0, &[10, 12], "NOL-M9 Outpost", (550.0, 340.0)),
    system("VFK-IV", 0.0, &[11, 19], "VFK-IV Sovereignty Station", (50.0, 320.0)),
    system("1DQ1-A", 0.0, &[12, 14], "1DQ1-A Keepstar", (660.0, 340.0)),
    system("Delve", 0.0, &[13, 16], "Delve Mining Colony", (380.0, 480.0)),
    system("Fountain", 0.0, &[15, 19], "Fountain Logistics Hub", (200.0, 380.0)),
    system("Catch", 0.0, &[15, 18], "Catch Staging Point", (100.0, 420.0)),
];

pub fn index_of(name: &str) -> Option<usize> {
    SYSTEMS.iter().position(|s| s.name == name)
}
