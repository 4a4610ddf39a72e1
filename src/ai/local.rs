/// Offline assistant: keyword rules mapped to canned travel replies.
pub struct LocalAI;

/// Topics with a canned reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    PlanTrip,
    FindHotels,
    Weather,
    Emergency,
    Photography,
    Adventure,
}

/// Keyword test against an already lowercased message.
#[derive(Debug, Clone, Copy)]
enum Keywords {
    All(&'static [&'static str]),
    Any(&'static [&'static str]),
}

impl Keywords {
    fn matches(&self, input_lower: &str) -> bool {
        match self {
            Keywords::All(words) => words.iter().all(|w| input_lower.contains(w)),
            Keywords::Any(words) => words.iter().any(|w| input_lower.contains(w)),
        }
    }
}

// First match wins, so row order is precedence.
const FALLBACK_TABLE: [(Topic, Keywords); 6] = [
    (Topic::PlanTrip, Keywords::All(&["plan", "trip"])),
    (Topic::FindHotels, Keywords::Any(&["hotel", "stay"])),
    (Topic::Weather, Keywords::Any(&["weather"])),
    (Topic::Emergency, Keywords::Any(&["emergency"])),
    (Topic::Photography, Keywords::Any(&["photo", "camera"])),
    (Topic::Adventure, Keywords::Any(&["adventure", "activity"])),
];

pub const WELCOME: &str = "Welcome to HeritaGo! I'm your AI travel assistant for Sri Lanka. I can help you with:
• Planning personalized trips
• Finding hotels and accommodations
• Weather updates and alerts
• Local recommendations
• Emergency information

How can I assist you today? 🇱🇰";

pub const CAPABILITIES: &str = "I can help you with planning trips, finding hotels, checking weather, emergency information, photography spots, and adventure activities. What would you like to know about?";

impl Topic {
    /// Key of the topic as used by the web client.
    pub fn key(&self) -> &'static str {
        match self {
            Topic::PlanTrip => "plan trip",
            Topic::FindHotels => "find hotels",
            Topic::Weather => "weather",
            Topic::Emergency => "emergency",
            Topic::Photography => "photography",
            Topic::Adventure => "adventure",
        }
    }

    pub fn reply(&self) -> &'static str {
        match self {
            Topic::PlanTrip => "Here's a suggested 3-day itinerary for Sri Lanka:

Day 1: Colombo & Negombo
- Morning: Explore Colombo's historical sites
- Afternoon: Visit Gangaramaya Temple
- Evening: Negombo beach & seafood dinner

Day 2: Kandy
- Morning: Temple of the Tooth Relic
- Afternoon: Royal Botanical Gardens
- Evening: Cultural dance show

Day 3: Sigiriya
- Morning: Climb Sigiriya Rock Fortress
- Afternoon: Dambulla Cave Temple
- Evening: Safari at Minneriya National Park

Would you like more specific details about any of these locations?",
            Topic::FindHotels => "Here are some recommended hotels in Kandy under LKR 15,000:

1. Hotel Suisse Kandy
- Colonial charm
- Lake view rooms
- LKR 12,000/night

2. Heaven's Edge
- Mountain views
- Traditional architecture
- LKR 10,500/night

3. Royal Tourist Lodge
- City center location
- Modern amenities
- LKR 8,000/night

Would you like to know more about any of these hotels?",
            Topic::Weather => "Current weather in Sri Lanka:

Colombo: 28-32°C, Partly cloudy
Kandy: 23-27°C, Light rain expected
Nuwara Eliya: 15-20°C, Misty mornings
Galle: 27-30°C, Sunny intervals

Best time to visit: December to March (dry season)
Monsoon seasons:
- Southwest: May to September
- Northeast: October to February",
            Topic::Emergency => "Important emergency contacts in Sri Lanka:

Police: 119
Ambulance: 1990
Tourist Police: +94 11 2421451
Tourist Board: +94 11 2426900
COVID Hotline: 1390

Major Hospitals:
- National Hospital (Colombo): +94 11 2691111
- Kandy General: +94 81 2233337
- Galle Hospital: +94 91 2232276",
            Topic::Photography => "Best photography locations in Sri Lanka:

1. Sigiriya Rock Fortress
- Best time: Sunrise
- Tip: Get there early for morning mist

2. Nine Arch Bridge, Ella
- Best time: When train passes (9:30 AM, 3:30 PM)
- Tip: View from tea plantations

3. Galle Fort
- Best time: Sunset
- Tip: Lighthouse area is most photogenic

4. Coconut Tree Hill, Mirissa
- Best time: Golden hour
- Tip: Visit during off-season for fewer crowds

5. Horton Plains
- Best time: Early morning
- Tip: World's End viewpoint is spectacular",
            Topic::Adventure => "Popular adventure activities in Sri Lanka:

1. White Water Rafting
- Location: Kitulgala
- Difficulty: Beginner to Advanced
- Best season: May to December

2. Hiking
- Adam's Peak (Sri Pada)
- Knuckles Mountain Range
- Ella Rock

3. Surfing
- Arugam Bay (May-September)
- Mirissa (October-April)
- Weligama (Year-round)

4. Wildlife Safaris
- Yala National Park
- Udawalawe
- Minneriya

5. Scuba Diving
- Trincomalee
- Unawatuna
- Pigeon Island",
        }
    }
}

impl LocalAI {
    /// First topic whose keywords appear in the message.
    pub fn match_topic(user_input: &str) -> Option<Topic> {
        let input_lower = user_input.to_lowercase();

        FALLBACK_TABLE
            .iter()
            .find(|(_, keywords)| keywords.matches(&input_lower))
            .map(|(topic, _)| *topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_and_trip_must_both_appear() {
        assert_eq!(
            LocalAI::match_topic("Can you help me PLAN a TRIP to Kandy?"),
            Some(Topic::PlanTrip)
        );
        assert_ne!(LocalAI::match_topic("I have a plan"), Some(Topic::PlanTrip));
        assert_ne!(LocalAI::match_topic("my last trip"), Some(Topic::PlanTrip));
    }

    #[test]
    fn hotel_and_stay_share_a_reply() {
        assert_eq!(LocalAI::match_topic("any hotel in Ella?"), Some(Topic::FindHotels));
        assert_eq!(LocalAI::match_topic("where should I stay"), Some(Topic::FindHotels));
        assert_eq!(
            LocalAI::match_topic("hotels near Galle"),
            Some(Topic::FindHotels)
        );
    }

    #[test]
    fn each_topic_has_its_keywords() {
        let cases = [
            ("What's the weather like?", Topic::Weather),
            ("This is an emergency", Topic::Emergency),
            ("best photo spots", Topic::Photography),
            ("should I bring a camera", Topic::Photography),
            ("looking for adventure", Topic::Adventure),
            ("a fun activity for kids", Topic::Adventure),
        ];
        for (input, topic) in cases {
            assert_eq!(LocalAI::match_topic(input), Some(topic), "{input}");
        }
    }

    #[test]
    fn earlier_rows_take_precedence() {
        for _ in 0..3 {
            assert_eq!(
                LocalAI::match_topic("weather at my hotel"),
                Some(Topic::FindHotels)
            );
        }
        assert_eq!(
            LocalAI::match_topic("plan a trip, hotel and weather"),
            Some(Topic::PlanTrip)
        );
        assert_eq!(
            LocalAI::match_topic("emergency: lost my camera"),
            Some(Topic::Emergency)
        );
    }

    #[test]
    fn unmatched_message_has_no_topic() {
        assert_eq!(LocalAI::match_topic("tell me a joke"), None);
    }

    #[test]
    fn topic_keys_are_stable() {
        let keys: Vec<_> = FALLBACK_TABLE.iter().map(|(t, _)| t.key()).collect();
        assert_eq!(
            keys,
            ["plan trip", "find hotels", "weather", "emergency", "photography", "adventure"]
        );
    }
}
