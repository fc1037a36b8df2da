use std::borrow::Cow;
use std::fmt;

/// Vendor sport code of an activity. Displays as the sport's name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SportType(pub u32);

const SPORTS: &[(u32, &str)] = &[
    (100, "Run"),
    (101, "Indoor Run"),
    (102, "Trail Run"),
    (103, "Track Run"),
    (104, "Hike"),
    (105, "Mtn Climb"),
    (106, "Climb"),
    (200, "Road Bike"),
    (201, "Indoor Bike"),
    (202, "E-Bike"),
    (203, "Gravel Bike"),
    (204, "Mountain Bike"),
    (205, "E-MTB"),
    (299, "Helmet Riding"),
    (300, "Pool Swim"),
    (301, "Open Water"),
    (400, "Gym Cardio"),
    (401, "GPS Cardio"),
    (402, "Strength"),
    (500, "Ski"),
    (501, "Snowboard"),
    (502, "XC Ski"),
    (503, "Ski Touring"),
    (700, "Rowing"),
    (701, "Indoor Rower"),
    (702, "Whitewater"),
    (704, "Flatwater"),
    (705, "Windsurfing"),
    (706, "Speedsurfing"),
    (800, "Indoor Climb"),
    (801, "Bouldering"),
    (900, "Walk"),
    (901, "Jump Rope"),
    (902, "Floor Climb"),
    (10000, "Triathlon"),
    (10001, "Multisport"),
    (10002, "Ski Touring"),
    (10003, "Outdoor Climb"),
];

impl SportType {
    pub fn code(self) -> u32 {
        self.0
    }

    /// Human name for known codes, `Type {code}` otherwise.
    pub fn name(self) -> Cow<'static, str> {
        SPORTS
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| Cow::Borrowed(*name))
            .unwrap_or_else(|| Cow::Owned(format!("Type {}", self.0)))
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
