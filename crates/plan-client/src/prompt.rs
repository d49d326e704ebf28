use crate::attributes::PlayerAttributes;
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = "You are a performance optimization expert, helping football players \
with personalized training, recovery, and diet strategies.";

const PLAN_TEMPLATE: &str = "\
You are a professional sports performance expert. Based on the following player's physical and \
performance data, generate a structured and detailed plan in the following format:

*** Here is your personalized performance, recovery, and nutrition plan: ***

**Training Plan**
- **Focus Areas**: (e.g., Strength, Agility, Stamina, based on the player's performance data)
- **Exercise Recommendations**: (List 3-5 exercises with sets, reps, and intensity recommendations)
- **Weekly Training Hours**: (e.g., X hours/week, tailored to energy level and soreness)
- **Performance Goals**: (e.g., Improve total distance, high-speed running, or sprints)

**Recovery Plan**
- **Rest Days**: (e.g., 2-3 days/week depending on soreness and stress levels)
- **Recovery Techniques**: (e.g., Massage, cryotherapy, active recovery, customized for the player's recovery needs)
- **Sleep Recommendations**: (e.g., Bedtime routine, optimal sleep duration for recovery and performance)
- **Additional Restorative Practices**: (e.g., Stretching, light recovery exercises, mindfulness)

**Diet Plan**
- **Daily Caloric Intake**: (e.g., XXXX kcal/day based on weight, BMI, and energy needs)
- **Macronutrient Breakdown**: (e.g., XX% Carbs / XX% Protein / XX% Fat)
- **Hydration**: (e.g., 3 liters of water/day or more depending on the intensity of activity)
- **Sample Meals**:
    - Breakfast: (e.g., Protein-rich, high-carb meal for energy)
    - Lunch: (e.g., Balanced meal with lean protein and complex carbs)
    - Dinner: (e.g., Light, easily digestible protein source with healthy fats)
    - Snacks: (e.g., Energy-boosting snacks for recovery or pre-workout)

Now generate a plan for this player:
";

const CLOSING: &str = "\
Be detailed but concise. Use bullet points for clarity and ensure each section follows the format \
above. Tailor the plan to the player's current condition and optimize for future performance.";

/// Fills the plan template with one player's attributes.
pub fn build_prompt(attributes: &PlayerAttributes) -> String {
    let mut prompt = String::from(PLAN_TEMPLATE);
    let lines = [
        format!("Weight: {} kg", attributes.weight_kg),
        format!("Height: {} cm", attributes.height_cm),
        format!("Energy Level: {}", attributes.energy),
        format!("Stress Level: {}", attributes.stress),
        format!("Sleep Quality: {}", attributes.sleep_quality),
        format!("Soreness Level: {}", attributes.soreness),
        format!("Total Distance: {} km", attributes.total_distance_km),
        format!("High-Speed Running: {} km", attributes.high_speed_running_km),
        format!("Minutes per Session: {}", attributes.minutes_per_session),
        format!("Number of Sprints: {}", attributes.sprints),
        format!("BMI: {:.2}", attributes.bmi()),
    ];
    for line in lines {
        // Writing to a String cannot fail.
        let _ = writeln!(prompt, "- {line}");
    }
    prompt.push('\n');
    prompt.push_str(CLOSING);
    prompt
}
